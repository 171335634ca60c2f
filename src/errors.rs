use thiserror::Error;

use cashflow_config::ConfigError;
use cashflow_core::CoreError;

/// Error type surfaced by the CLI and export layers.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
