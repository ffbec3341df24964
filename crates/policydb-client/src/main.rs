//! policydb agent
//!
//! - Loads `policydb.yaml` (or the path given as first argument)
//! - Mirrors the rules and base-names partitions from the configured feed
//! - Serves rule lookup, base-name expansion and charging keys over HTTP

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use policydb_client::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "policydb.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .http
        .listen
        .parse()
        .map_err(|e| format!("http.listen must be a valid SocketAddr: {e}"))?;

    let state = match app_state::AppState::new(cfg).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind().as_str(), "startup failed");
            return Err(e.into());
        }
    };
    let app = router::build_router(state);

    tracing::info!(%listen, "policydb-agent starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
