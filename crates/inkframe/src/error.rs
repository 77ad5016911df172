//! Application error types.

use std::io;

use thiserror::Error;

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors that can occur during a render run.
#[derive(Debug, Error)]
pub enum AppError {
    /// A calendar backend failed.
    #[error("provider error: {0}")]
    Provider(#[from] inkframe_providers::ProviderError),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Reading the template or writing the output failed.
    #[error("render error: {0}")]
    Render(#[from] io::Error),
}

impl AppError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
