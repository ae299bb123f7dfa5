use crate::handlers::{HandlerRegistry, HandlerSet, HandlerTarget};
use crate::responder::Responder;
use crate::runtime_config::{RuntimeConfig, DEFAULT_MAX_BODY_BYTES};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything [`build_router`](crate::build_router) needs.
///
/// ```
/// use routebind::{EchoHandlers, RouterConfig};
///
/// let config = RouterConfig::new()
///     .route_file("config/api-route.yaml")
///     .target("users", EchoHandlers)
///     .max_body_bytes(64 * 1024);
/// assert_eq!(config.handlers.len(), 1);
/// ```
#[derive(Clone)]
pub struct RouterConfig {
    /// Route file to load. `None` probes the default locations.
    pub route_file: Option<PathBuf>,
    pub handlers: HandlerRegistry,
    /// `None` uses a non-verbose [`JsonResponder`](crate::JsonResponder).
    pub responder: Option<Arc<dyn Responder>>,
    pub max_body_bytes: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            route_file: None,
            handlers: HandlerRegistry::new(),
            responder: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RouterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.route_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Register a typed handler set for `group`.
    #[must_use]
    pub fn set<T: HandlerSet>(mut self, group: impl Into<String>, set: T) -> Self {
        self.handlers.insert_set(group, set);
        self
    }

    /// Register a dynamic handler target for `group`.
    #[must_use]
    pub fn target(mut self, group: impl Into<String>, target: impl HandlerTarget) -> Self {
        self.handlers.insert_target(group, target);
        self
    }

    #[must_use]
    pub fn responder(mut self, responder: impl Responder) -> Self {
        self.responder = Some(Arc::new(responder));
        self
    }

    #[must_use]
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Apply environment overrides.
    ///
    /// A route file from the environment replaces the configured one. Verbose
    /// errors install a verbose [`JsonResponder`](crate::JsonResponder) only
    /// when no responder has been set explicitly.
    #[must_use]
    pub fn with_runtime(mut self, runtime: &RuntimeConfig) -> Self {
        if let Some(path) = &runtime.route_file {
            self.route_file = Some(path.clone());
        }
        if runtime.verbose_errors && self.responder.is_none() {
            self.responder = Some(Arc::new(crate::JsonResponder::new(true)));
        }
        self.max_body_bytes = runtime.max_body_bytes;
        self
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("route_file", &self.route_file)
            .field("handlers", &self.handlers)
            .field("custom_responder", &self.responder.is_some())
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
