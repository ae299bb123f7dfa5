//! # CLI Module
//!
//! The `routebind` binary.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Resolve and parse a route file and print what it declares:
//!
//! ```bash
//! routebind check --routes internal/api-route.yaml
//! routebind check --json
//! routebind check --bind
//! ```
//!
//! `--bind` additionally runs the full binding pipeline against the echo
//! target, so path syntax errors and capture conflicts are reported too.
//!
//! ### `serve`
//!
//! Serve every route in the file with [`EchoHandlers`](crate::EchoHandlers),
//! which answer with a description of the request they received:
//!
//! ```bash
//! routebind serve --routes internal/api-route.yaml --addr 127.0.0.1:8080
//! curl http://127.0.0.1:8080/users/1
//! ```
//!
//! The route file may also be given through `ROUTEBIND_ROUTE_FILE`.

mod commands;


pub use commands::{echo_config, load_document, run_cli, write_route_table, Cli, Commands};
