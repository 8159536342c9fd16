//! Dataset Bucket Provisioner
//!
//! One-shot script that ensures the dataset bucket exists and the CSV is
//! uploaded. Safe to re-run: once bucket and object are present it performs
//! no further writes. Exits non-zero on any abort.

use stress_dashboard::config::AppConfig;
use stress_dashboard::storage::{provision, S3Store};

#[tokio::main]
async fn main() {
    // Status reporting happens on stdout; tracing only carries SDK warnings.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    let store = S3Store::connect(&config.storage);

    if let Err(e) = provision(&store, &config.storage).await {
        eprintln!("Provisioning aborted: {e:#}");
        std::process::exit(1);
    }
}
