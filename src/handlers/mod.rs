//! # Handlers Module
//!
//! Handler targets and the typed method tables they expose to the binder.
//!
//! A route group is served by one target. The binder asks the target for a
//! method by name and gets back a [`Method`] whose call shape is fixed when it
//! is registered:
//!
//! - [`MethodTable::unit`]: the handler writes its own response
//! - [`MethodTable::fallible`]: errors are translated into an error envelope
//! - [`MethodTable::returning`]: values become a success envelope, errors an
//!   error envelope
//!
//! Functions with any other parameter list or return type do not type-check
//! against these calls, so a wrongly shaped handler never reaches runtime.

mod echo;
mod method;
mod registry;
mod target;

pub use echo::EchoHandlers;
pub use method::{HandlerResult, Method, MethodTable, Outcome, ReturnShape};
pub use registry::HandlerRegistry;
pub use target::{HandlerSet, HandlerTarget, SetTarget};
