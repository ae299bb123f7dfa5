use crate::handlers::{EchoHandlers, HandlerRegistry};
use crate::registrar::{bind_routes, build_router};
use crate::responder::JsonResponder;
use crate::routes::{parse_route_document, resolve_route_file, RouteDocument};
use crate::runtime_config::RuntimeConfig;
use crate::RouterConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line interface for routebind
#[derive(Parser)]
#[command(name = "routebind")]
#[command(version, about = "Bind a YAML route file to handlers and serve it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and parse the route file, then print the routes it declares
    Check {
        /// Route file (default: probe internal/api-route.yaml, api-route.yaml, config/api-route.yaml)
        #[arg(short, long, env = "ROUTEBIND_ROUTE_FILE")]
        routes: Option<PathBuf>,

        /// Print the parsed document as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also bind every route against the echo target, catching path errors
        #[arg(long, default_value_t = false)]
        bind: bool,
    },
    /// Serve every route with the built-in echo handlers
    Serve {
        /// Route file (default: probe internal/api-route.yaml, api-route.yaml, config/api-route.yaml)
        #[arg(short, long, env = "ROUTEBIND_ROUTE_FILE")]
        routes: Option<PathBuf>,

        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        addr: SocketAddr,

        /// Include the full error chain in error envelopes
        #[arg(long, default_value_t = false)]
        verbose_errors: bool,
    },
}

/// Resolve, read and parse the route file.
pub fn load_document(routes: Option<&Path>) -> Result<(PathBuf, RouteDocument)> {
    let path = resolve_route_file(routes)?;
    let bytes = std::fs::read(&path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    let document = parse_route_document(&bytes)
        .with_context(|| format!("failed to parse route file {}", path.display()))?;
    Ok((path, document))
}

/// Router configuration serving every group of `document` with [`EchoHandlers`].
#[must_use]
pub fn echo_config(path: &Path, document: &RouteDocument) -> RouterConfig {
    let mut handlers = HandlerRegistry::new();
    for group in document.groups() {
        handlers.insert_target(group, EchoHandlers);
    }
    RouterConfig::new().handlers(handlers).route_file(path)
}

/// Write a plain-text table of every route.
pub fn write_route_table(
    out: &mut impl Write,
    path: &Path,
    document: &RouteDocument,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{}: {} group(s), {} route(s)",
        path.display(),
        document.group_count(),
        document.route_count()
    )?;
    let group_width = document.groups().map(str::len).max().unwrap_or(0);
    for (group, routes) in document.iter() {
        for route in routes {
            writeln!(
                out,
                "  {group:<group_width$}  {:<7}  {} -> {}",
                route.method.as_str(),
                route.path,
                route.handler
            )?;
        }
    }
    Ok(())
}

fn check(routes: Option<&Path>, json: bool, bind: bool) -> Result<()> {
    let (path, document) = load_document(routes)?;

    if bind {
        let bindings = bind_routes(&echo_config(&path, &document))?;
        if bindings.len() < document.route_count() {
            warn!(
                skipped = document.route_count() - bindings.len(),
                "duplicate routes will be ignored"
            );
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &document)?;
        writeln!(out)?;
    } else {
        write_route_table(&mut out, &path, &document)?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn serve(routes: Option<&Path>, addr: SocketAddr, verbose_errors: bool) -> Result<()> {
    let (path, document) = load_document(routes)?;

    let runtime = RuntimeConfig::from_env();
    let mut config = echo_config(&path, &document).with_runtime(&runtime);
    // The runtime route file must not override the one just loaded.
    config.route_file = Some(path);
    if verbose_errors {
        config = config.responder(JsonResponder::new(true));
    }

    let router = build_router(config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %listener.local_addr()?, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Run a parsed command line.
pub async fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            routes,
            json,
            bind,
        } => check(routes.as_deref(), json, bind),
        Commands::Serve {
            routes,
            addr,
            verbose_errors,
        } => serve(routes.as_deref(), addr, verbose_errors).await,
    }
}
