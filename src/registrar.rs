//! # Registrar Module
//!
//! The startup pipeline: resolve the route file, parse it, bind every route to
//! its group's handler target and register the adapters with an
//! [`axum::Router`].
//!
//! Registration either succeeds completely or returns the first error. There
//! are no partial routers. Requests for a known path with an undeclared method
//! are answered `404 Not Found`, like any unknown path, rather than
//! `405 Method Not Allowed`.

use crate::binder::{bind, BindError, BoundHandler};
use crate::config::RouterConfig;
use crate::responder::{JsonResponder, Responder};
use crate::routes::{
    parse_route_document, resolve_route_file, HttpMethod, ParseError, ResolveError, RouteSpec,
};
use axum::extract::Request;
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use http::StatusCode;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no handler targets registered")]
    EmptyHandlerRegistry,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("failed to read route file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse route file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("no handler target registered for group {group:?}")]
    MissingHandlerTarget { group: String },
    #[error("{group}.{handler}: {source}")]
    Binding {
        group: String,
        handler: String,
        #[source]
        source: BindError,
    },
    #[error("{group}.{handler}: invalid route path {path:?}: {reason}")]
    InvalidRoutePath {
        group: String,
        handler: String,
        path: String,
        reason: &'static str,
    },
    #[error("route {path:?} conflicts with {existing:?}: captures at the same position must share a name")]
    ConflictingRoute { path: String, existing: String },
}

/// One route bound to its handler, ready for registration.
#[derive(Debug, Clone)]
pub struct RouteBinding {
    pub group: String,
    pub route: RouteSpec,
    pub handler: Arc<BoundHandler>,
}

/// Check that `path` is something the router accepts.
fn validate_path(path: &str) -> Result<(), &'static str> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err("path must start with '/'");
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len().saturating_sub(1);
    let mut names = HashSet::new();
    for (index, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') {
            return Err("':name' captures are not supported, use '{name}'");
        }
        if segment.starts_with('*') {
            return Err("'*name' wildcards are not supported, use '{*name}'");
        }
        if !segment.contains(['{', '}']) {
            continue;
        }
        let Some(inner) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        else {
            return Err("a capture must span a whole segment");
        };
        let (name, catch_all) = match inner.strip_prefix('*') {
            Some(name) => (name, true),
            None => (inner, false),
        };
        if name.is_empty() || name.contains(['{', '}', '*']) {
            return Err("capture name is empty or malformed");
        }
        if catch_all && index != last {
            return Err("a catch-all capture must be the last segment");
        }
        if !names.insert(name) {
            return Err("capture name is used more than once");
        }
    }
    Ok(())
}

/// Capture segments of `path` keyed by everything up to and including them,
/// with capture names erased.
fn capture_positions(path: &str) -> Vec<(String, &str)> {
    let mut prefix = String::new();
    let mut positions = Vec::new();
    for segment in path.split('/').skip(1) {
        prefix.push('/');
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(capture) => {
                prefix.push_str("{}");
                positions.push((prefix.clone(), capture));
            }
            None => prefix.push_str(segment),
        }
    }
    positions
}

/// Rejects distinct paths that name the same capture position differently.
#[derive(Default)]
struct CaptureIndex {
    seen: HashMap<String, (String, String)>,
}

impl CaptureIndex {
    fn insert(&mut self, path: &str) -> Result<(), BuildError> {
        for (position, capture) in capture_positions(path) {
            match self.seen.entry(position) {
                Entry::Occupied(entry) => {
                    let (existing_capture, existing_path) = entry.get();
                    if existing_capture != capture {
                        return Err(BuildError::ConflictingRoute {
                            path: path.to_string(),
                            existing: existing_path.clone(),
                        });
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert((capture.to_string(), path.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Resolve, parse and bind every route without building a router.
pub fn bind_routes(config: &RouterConfig) -> Result<Vec<RouteBinding>, BuildError> {
    if config.handlers.is_empty() {
        return Err(BuildError::EmptyHandlerRegistry);
    }

    let path = resolve_route_file(config.route_file.as_deref())?;
    let bytes = std::fs::read(&path).map_err(|source| BuildError::FileRead {
        path: path.clone(),
        source,
    })?;
    let document = parse_route_document(&bytes).map_err(|source| BuildError::Parse {
        path: path.clone(),
        source,
    })?;
    debug!(
        path = %path.display(),
        groups = document.group_count(),
        routes = document.route_count(),
        "parsed route file"
    );

    let responder: Arc<dyn Responder> = match &config.responder {
        Some(responder) => Arc::clone(responder),
        None => Arc::new(JsonResponder::new(false)),
    };

    let mut captures = CaptureIndex::default();
    let mut registered: HashSet<(HttpMethod, &str)> = HashSet::new();
    let mut bindings = Vec::with_capacity(document.route_count());

    for (group, routes) in document.iter() {
        let target = config
            .handlers
            .get(group)
            .ok_or_else(|| BuildError::MissingHandlerTarget {
                group: group.to_string(),
            })?;

        for route in routes {
            validate_path(&route.path).map_err(|reason| BuildError::InvalidRoutePath {
                group: group.to_string(),
                handler: route.handler.clone(),
                path: route.path.clone(),
                reason,
            })?;
            captures.insert(&route.path)?;

            let bound = bind(target, &route.handler, Arc::clone(&responder)).map_err(|source| {
                BuildError::Binding {
                    group: group.to_string(),
                    handler: route.handler.clone(),
                    source,
                }
            })?;

            if !registered.insert((route.method, route.path.as_str())) {
                warn!(
                    group,
                    method = %route.method,
                    path = %route.path,
                    handler = %route.handler,
                    "duplicate route ignored, keeping the first registration"
                );
                continue;
            }

            bindings.push(RouteBinding {
                group: group.to_string(),
                route: route.clone(),
                handler: Arc::new(bound),
            });
        }
    }

    info!(
        route_file = %path.display(),
        groups = document.group_count(),
        routes = bindings.len(),
        "routes bound"
    );
    Ok(bindings)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build a router serving every route in the configured route file.
///
/// ```no_run
/// use routebind::{build_router, EchoHandlers, RouterConfig};
///
/// # async fn run() -> anyhow::Result<()> {
/// let router = build_router(
///     RouterConfig::new()
///         .route_file("internal/api-route.yaml")
///         .target("users", EchoHandlers),
/// )?;
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, router).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_router(config: RouterConfig) -> Result<Router, BuildError> {
    let bindings = bind_routes(&config)?;
    let body_limit = config.max_body_bytes;

    // One method router per path, in first-seen order.
    let mut paths: Vec<(String, Vec<RouteBinding>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for binding in bindings {
        match index.get(&binding.route.path) {
            Some(&slot) => paths[slot].1.push(binding),
            None => {
                index.insert(binding.route.path.clone(), paths.len());
                paths.push((binding.route.path.clone(), vec![binding]));
            }
        }
    }

    let mut router = Router::new();
    for (path, bindings) in paths {
        let mut method_router = MethodRouter::new().fallback(not_found);
        let methods: HashSet<HttpMethod> = bindings.iter().map(|b| b.route.method).collect();
        // axum answers HEAD with the GET handler unless HEAD has its own endpoint.
        if methods.contains(&HttpMethod::Get) && !methods.contains(&HttpMethod::Head) {
            method_router = method_router.on(MethodFilter::HEAD, not_found);
        }
        for binding in bindings {
            let bound = binding.handler;
            let adapter = move |request: Request| {
                let bound = Arc::clone(&bound);
                async move { bound.serve(request, body_limit).await }
            };
            method_router = method_router.on(binding.route.method.method_filter(), adapter);
        }
        router = router.route(&path, method_router);
    }
    Ok(router.fallback(not_found))
}
