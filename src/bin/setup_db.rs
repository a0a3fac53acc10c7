//! Applies the SQL migrations to the hosted database.
//!
//! Requires SUPABASE_SERVICE_ROLE_KEY. Exits non-zero on the first failed script.

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pattern_whisper::config::{Config, KeyRole, SERVICE_KEY_HINT_URL};
use pattern_whisper::error::Result;
use pattern_whisper::migrate::{ensure_exec_function, MigrationRunner};
use pattern_whisper::store::PostgrestClient;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cfg = match Config::from_env(KeyRole::ServiceRole) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            eprintln!("Get it from: {SERVICE_KEY_HINT_URL}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let store = PostgrestClient::new(&cfg)?;
    info!("Setting up Pattern Whisper database at {}", cfg.store_url);

    if let Err(e) = ensure_exec_function(&store).await {
        error!("Failed to create exec function: {e}");
    }

    let runner = MigrationRunner::new(&store, &cfg.migrations_dir);
    let report = runner.run().await?;

    info!("All {} migrations completed successfully", report.applied.len());
    info!("Next steps:");
    info!("1. Load daily price history into stocks_daily and crypto_daily (optional demo data)");
    info!("2. Start the app: cargo run --bin whisper");
    Ok(())
}
