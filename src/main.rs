use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pattern_whisper::api::health::HealthState;
use pattern_whisper::api::routes::{router, ApiState};
use pattern_whisper::config::{Config, KeyRole};
use pattern_whisper::error::Result;
use pattern_whisper::smoke::test_connection;
use pattern_whisper::store::{PostgrestClient, RemoteStore};
use pattern_whisper::types::ConnectionStatus;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cfg = match Config::from_env(KeyRole::Anon) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let store: Arc<dyn RemoteStore> = Arc::new(PostgrestClient::new(&cfg)?);
    let health = Arc::new(HealthState::new());

    // --- Startup probe: informational only, the page re-probes on load ---
    let status = test_connection(store.as_ref()).await;
    match &status {
        ConnectionStatus::Connected => info!("Remote store reachable at {}", cfg.store_url),
        ConnectionStatus::Failed(reason) => warn!("Remote store probe failed: {reason}"),
        ConnectionStatus::Pending => {}
    }
    health.set_connection(status);

    // --- HTTP server ---
    let app = router(ApiState { store, health });
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Pattern Whisper listening on http://{bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
