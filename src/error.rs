//! Application error types.

use thiserror::Error;

/// Application-level errors for content migrations.
#[derive(Error, Debug)]
pub enum AppError {
    // Store errors
    #[error("Content item document not found: {0}")]
    DocumentNotFound(u64),

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Migration errors
    #[error("Unknown migration feature: {0}")]
    UnknownFeature(String),

    #[error("Migration {migration} returned version {returned}, expected a version above {current}")]
    VersionRegression {
        migration: String,
        current: u32,
        returned: u32,
    },
}

impl AppError {
    /// Shorthand for a backend failure with a formatted message.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}
