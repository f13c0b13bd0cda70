// src/error.rs

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the collaborator-facing surfaces: config validation,
/// config loading and report export. The simulation engine itself does not fail.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("unknown demand pattern '{0}' (expected stable, seasonal, trending or volatile)")]
    UnknownPattern(String),

    #[error("unknown uncertainty level '{0}' (expected low, medium, high or very-high)")]
    UnknownUncertainty(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
