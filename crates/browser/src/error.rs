//! Browser error types.

use thiserror::Error;

/// Errors that can occur during browser operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    JsEval(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Cdp(err.to_string())
    }
}
