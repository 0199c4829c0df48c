// src/error.rs

use thiserror::Error;

/// Everything that can stop a run before (or while) it produces output.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid probability table '{name}': {reason}")]
    InvalidTable { name: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_table(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTable {
            name,
            reason: reason.into(),
        }
    }
}
