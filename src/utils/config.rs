// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::processing::QueryOptions;
use super::{AppError, AppResult};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            enable_cors: false,
        }
    }
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: Option<String>,
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            path: None,
            delimiter: ',',
        }
    }
}

/// Query limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub row_limit: usize,
    pub preview_limit: usize,
    pub sample_seed: Option<u64>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let options = QueryOptions::default();
        QueryConfig {
            row_limit: options.row_limit,
            preview_limit: options.preview_limit,
            sample_seed: options.sample_seed,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a `.json`, `.yaml` or `.yml` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => serde_json::from_str(&contents)
                .map_err(|e| AppError::Config(e.to_string())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .map_err(|e| AppError::Config(e.to_string())),
            _ => Err(AppError::Config(format!(
                "Unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }

    /// Query options derived from the `query` section
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            row_limit: self.query.row_limit,
            preview_limit: self.query.preview_limit,
            sample_seed: self.query.sample_seed,
        }
    }
}
