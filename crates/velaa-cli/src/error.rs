//! Application error types.

use registration_flow::FlowError;
use thiserror::Error;
use velaa_client::ApiError;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not read input: {0}")]
    Input(#[from] std::io::Error),
}

impl AppError {
    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Flow(e) => e.user_message(),
            AppError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Flow(e) => e.is_retryable(),
            AppError::Api(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
