//! Registration flow errors.

use crate::page::Page;
use thiserror::Error;
use velaa_client::ApiError;

/// Errors raised while driving the registration or recovery flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Please enter a valid Tanzanian phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("{0}")]
    Validation(String),

    /// The backend answered without reporting success.
    #[error("{0}")]
    Rejected(String),

    /// The current page needs state the session does not hold.
    #[error("{message}")]
    SessionRequired { redirect: Page, message: String },

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl FlowError {
    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FlowError::Api(e) if e.is_retryable())
    }
}

/// Session persistence errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
