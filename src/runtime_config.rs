//! # Runtime Configuration Module
//!
//! Environment overrides applied on top of a [`RouterConfig`](crate::RouterConfig).
//!
//! ## Environment Variables
//!
//! ### `ROUTEBIND_ROUTE_FILE`
//!
//! Route file to load instead of probing the default locations.
//!
//! ### `ROUTEBIND_VERBOSE_ERRORS`
//!
//! `1`, `true`, `yes` or `on` (any case) adds a `detail` field with the full
//! error chain to error envelopes. Anything else leaves it off.
//!
//! ### `ROUTEBIND_MAX_BODY_BYTES`
//!
//! Largest request body buffered for a handler. Accepts values in:
//! - Decimal: `1048576` (1 MiB)
//! - Hexadecimal: `0x100000` (1 MiB)
//!
//! Default: `0x400000` (4 MiB)
//!
//! ## Usage
//!
//! ```rust
//! use routebind::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Body limit: {} bytes", config.max_body_bytes);
//! ```
//!
//! Unparseable values fall back to the defaults.

use std::env;
use std::path::PathBuf;

pub const ROUTE_FILE_ENV: &str = "ROUTEBIND_ROUTE_FILE";
pub const VERBOSE_ERRORS_ENV: &str = "ROUTEBIND_VERBOSE_ERRORS";
pub const MAX_BODY_BYTES_ENV: &str = "ROUTEBIND_MAX_BODY_BYTES";

/// Default request body limit (4 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 0x40_0000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub route_file: Option<PathBuf>,
    pub verbose_errors: bool,
    pub max_body_bytes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            route_file: None,
            verbose_errors: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let route_file = lookup(ROUTE_FILE_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let verbose_errors = lookup(VERBOSE_ERRORS_ENV)
            .map(|v| parse_bool(&v))
            .unwrap_or(false);
        let max_body_bytes = lookup(MAX_BODY_BYTES_ENV)
            .and_then(|v| parse_size(&v))
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        RuntimeConfig {
            route_file,
            verbose_errors,
            max_body_bytes,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_size(value: &str) -> Option<usize> {
    let value = value.trim();
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        usize::from_str_radix(hex, 16).ok()
    } else {
        value.parse().ok()
    }
}
