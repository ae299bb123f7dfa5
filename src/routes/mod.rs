//! # Routes Module
//!
//! Locating and parsing the route file.
//!
//! The route file is a YAML mapping of group names to route lists. Each group
//! shares one handler target; each entry names exactly one HTTP verb (in any
//! letter case) mapped to a path, plus the handler method to bind:
//!
//! ```yaml
//! users:
//!   route:
//!     - get: /users/{id}
//!       handler: GetUser
//!     - post: /users
//!       handler: CreateUser
//! ```
//!
//! [`resolve_route_file`] finds the file, [`parse_route_document`] turns its
//! bytes into a [`RouteDocument`]. Neither touches handler targets; binding
//! happens in [`crate::binder`].

mod load;
mod resolve;
mod types;

pub use load::{parse_route_document, ParseError};
pub use resolve::{
    resolve_route_file, resolve_route_file_in, ResolveError, DEFAULT_ROUTE_FILE,
    ROUTE_FILE_CANDIDATES,
};
pub use types::{HttpMethod, RouteDocument, RouteSpec};
