//! # routebind
//!
//! **routebind** binds a declarative YAML route file to handler methods supplied
//! by the application and produces an [`axum::Router`] ready to be served.
//!
//! ## Overview
//!
//! Routes live in a human-edited file, grouped by the service that handles
//! them:
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
//! Each group is served by one handler target. At startup every route's
//! handler name is looked up on its group's target once; requests then go
//! straight to the resolved method. Handler return values are turned into
//! JSON envelopes, and errors into HTTP error responses, by a pluggable
//! [`Responder`].
//!
//! ## Architecture
//!
//! - **[`routes`]** - Locating and parsing the route file
//! - **[`handlers`]** - Handler targets, typed method tables and the registry
//! - **[`binder`]** - Resolving handler names and dispatching requests to them
//! - **[`registrar`]** - The startup pipeline that produces the router
//! - **[`responder`]** - Success and error envelopes
//! - **[`errors`]** - [`ApiError`] and its translation to HTTP status codes
//! - **[`logging`]** - `tracing-subscriber` setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use routebind::{
//!     build_router, ApiError, HandlerResult, HandlerSet, MethodTable, RequestContext,
//!     RouterConfig,
//! };
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     #[serde(rename = "ID")]
//!     id: u64,
//! }
//!
//! struct Users;
//!
//! impl Users {
//!     fn get_user(&self, ctx: &mut RequestContext) -> HandlerResult<User> {
//!         let id = ctx
//!             .path_param("id")
//!             .and_then(|id| id.parse().ok())
//!             .ok_or_else(|| ApiError::bad_request("id must be a number"))?;
//!         if id != 1 {
//!             return Err(ApiError::new("USER_NOT_FOUND", "user not found")
//!                 .with_status(404)
//!                 .into());
//!         }
//!         Ok(User { id })
//!     }
//! }
//!
//! impl HandlerSet for Users {
//!     fn methods(table: &mut MethodTable<Self>) {
//!         table.returning("GetUser", Users::get_user);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let router = build_router(RouterConfig::new().set("users", Users))?;
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```
//!
//! `GET /users/1` answers `{"code":"OK","message":"success","data":{"ID":1}}`;
//! `GET /users/2` answers `404` with `{"code":"USER_NOT_FOUND","message":"user not found"}`.

pub mod binder;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod ids;
pub mod logging;
pub mod registrar;
pub mod responder;
pub mod routes;
pub mod runtime_config;

pub use binder::{bind, BindError, BoundHandler};
pub use config::RouterConfig;
pub use context::RequestContext;
pub use errors::{extract_error_info, ApiError, Code, ErrorInfo};
pub use handlers::{
    EchoHandlers, HandlerRegistry, HandlerResult, HandlerSet, HandlerTarget, Method, MethodTable,
    ReturnShape,
};
pub use registrar::{bind_routes, build_router, BuildError, RouteBinding};
pub use responder::{JsonResponder, Responder};
pub use routes::{
    parse_route_document, resolve_route_file, HttpMethod, ParseError, ResolveError,
    RouteDocument, RouteSpec,
};
pub use runtime_config::RuntimeConfig;
