//! Configuration management for the dashboard and the storage provisioner

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized ONNX classifier
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

/// Object storage configuration for the dataset provisioner
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// S3-compatible endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Static access key
    #[serde(default = "default_access_key")]
    pub access_key: String,
    /// Static secret key
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// Region name (MinIO accepts any)
    #[serde(default = "default_region")]
    pub region: String,
    /// Target bucket name
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Object key for the uploaded dataset
    #[serde(default = "default_object_key")]
    pub object_key: String,
    /// Local dataset file to upload
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model_path() -> String {
    "models/student_stress_rf.onnx".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_access_key() -> String {
    "minioadmin".to_string()
}

fn default_secret_key() -> String {
    "minioadmin".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket() -> String {
    "student-stress".to_string()
}

fn default_object_key() -> String {
    "StressLevelDataset.csv".to_string()
}

fn default_dataset_path() -> String {
    "data/StressLevelDataset.csv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            access_key: default_access_key(),
            secret_key: default_secret_key(),
            region: default_region(),
            bucket: default_bucket(),
            object_key: default_object_key(),
            dataset_path: default_dataset_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the conventional location, falling back to
    /// defaults when no config file is present.
    pub fn load() -> Result<Self> {
        let path = Path::new("config/config.toml");
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "127.0.0.1:8080");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.storage.bucket, "student-stress");
        assert_eq!(config.storage.object_key, "StressLevelDataset.csv");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[model]
path = "artifacts/stress.onnx"
onnx_threads = 2

[storage]
bucket = "stress-data"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1"); // defaulted
        assert_eq!(config.model.path, "artifacts/stress.onnx");
        assert_eq!(config.model.onnx_threads, 2);
        assert_eq!(config.storage.bucket, "stress-data");
        assert_eq!(config.storage.endpoint, "http://127.0.0.1:9000"); // defaulted
    }
}
