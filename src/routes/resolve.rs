use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Route file used when no explicit path is configured.
pub const DEFAULT_ROUTE_FILE: &str = "internal/api-route.yaml";

/// Locations probed, in order, when no explicit path is configured.
pub const ROUTE_FILE_CANDIDATES: [&str; 3] =
    [DEFAULT_ROUTE_FILE, "api-route.yaml", "config/api-route.yaml"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("route file {} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("api-route.yaml not found (tried {})", display_paths(.tried))]
    NoCandidate { tried: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Locate the route file relative to the working directory.
///
/// An explicit, non-empty path must exist. Without one, the entries of
/// [`ROUTE_FILE_CANDIDATES`] are probed in order and the first existing one
/// is returned.
pub fn resolve_route_file(explicit: Option<&Path>) -> Result<PathBuf, ResolveError> {
    resolve_route_file_in(Path::new(""), explicit)
}

/// Same as [`resolve_route_file`] with every relative path taken from `base`.
pub fn resolve_route_file_in(
    base: &Path,
    explicit: Option<&Path>,
) -> Result<PathBuf, ResolveError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        let full = base.join(path);
        if full.exists() {
            return Ok(full);
        }
        return Err(ResolveError::NotFound { path: full });
    }

    let tried: Vec<PathBuf> = ROUTE_FILE_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .collect();

    for candidate in &tried {
        if candidate.exists() {
            debug!(route_file = %candidate.display(), "route file resolved");
            return Ok(candidate.clone());
        }
    }

    Err(ResolveError::NoCandidate { tried })
}
