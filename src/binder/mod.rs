//! # Binder Module
//!
//! Turns a `(target, handler name)` pair into a [`BoundHandler`]: the method is
//! looked up once, and every request on the route then goes straight to it.
//!
//! Dispatch normalises the three handler shapes. `unit` handlers own the
//! response. `fallible` handlers only produce a response on error. `returning`
//! handlers produce a success envelope with status 200, code `OK` and message
//! `success`. Errors go through [`crate::extract_error_info`] and then the
//! configured [`crate::Responder`].

mod bound;

pub use bound::{bind, BindError, BoundHandler, SUCCESS_MESSAGE};
