//! Idempotent, run-to-completion provisioning of the dataset bucket.
//!
//! Re-running after a successful run is a no-op: every existence check goes
//! to the remote store, nothing is cached between runs, and nothing is
//! rolled back on failure.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use crate::config::StorageConfig;
use crate::storage::{Existence, ObjectStore};

/// Run the provisioning sequence against the given store.
///
/// Stages, each printing a status line and aborting the run on failure:
/// connectivity probe, bucket existence/create, local dataset check, object
/// existence/upload. There are no retries.
pub async fn provision<S: ObjectStore>(store: &S, config: &StorageConfig) -> Result<()> {
    println!("--- Provisioning object storage environment ---");

    // 1. Connectivity: nothing else is attempted against a dead endpoint.
    if let Err(e) = store.probe().await {
        println!("❌ Could not reach the object storage endpoint.");
        println!("   Check that the server is running at: {}", config.endpoint);
        return Err(e);
    }
    println!("✅ Connected to object storage at {}.", config.endpoint);

    // 2. Bucket: create only after an explicit not-found probe.
    match store.bucket_exists(&config.bucket).await {
        Ok(Existence::Present) => {
            println!("Bucket '{}' already exists.", config.bucket);
        }
        Ok(Existence::Absent) => {
            println!("Bucket '{}' not found. Creating...", config.bucket);
            store.create_bucket(&config.bucket).await?;
            println!("✅ Bucket '{}' created.", config.bucket);
        }
        Err(e) => {
            println!("❌ Error while checking bucket '{}'.", config.bucket);
            return Err(e);
        }
    }

    // 3. Local dataset must exist before any upload is attempted.
    let dataset_path = Path::new(&config.dataset_path);
    if !dataset_path.exists() {
        println!(
            "❌ Dataset file not found at '{}'.",
            config.dataset_path
        );
        println!(
            "   Place '{}' there and re-run the provisioner.",
            config.object_key
        );
        return Err(anyhow!(
            "dataset file '{}' does not exist",
            config.dataset_path
        ));
    }

    // 4. Object: upload only when absent, so re-runs are no-ops.
    match store.object_exists(&config.bucket, &config.object_key).await {
        Ok(Existence::Present) => {
            println!(
                "Dataset '{}' already exists in the bucket.",
                config.object_key
            );
        }
        Ok(Existence::Absent) => {
            println!("Dataset '{}' not found. Uploading...", config.object_key);
            let bytes = tokio::fs::read(dataset_path).await.with_context(|| {
                format!("failed to read dataset file '{}'", config.dataset_path)
            })?;
            store
                .put_object(&config.bucket, &config.object_key, bytes)
                .await?;
            println!("✅ Dataset '{}' uploaded.", config.object_key);
        }
        Err(e) => {
            println!(
                "❌ Error while checking object '{}' in the bucket.",
                config.object_key
            );
            return Err(e);
        }
    }

    println!("--- Object storage environment ready ---");
    Ok(())
}
