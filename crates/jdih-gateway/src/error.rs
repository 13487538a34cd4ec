//! Search gateway error types.

use thiserror::Error;

/// Errors that can occur while querying the regulation site.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("invalid detail link: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    /// Whether a single retry after backoff is worthwhile.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Timeout(_) | GatewayError::Http(_) => true,
            GatewayError::Status(code) => *code == 429 || *code >= 500,
            GatewayError::InvalidUrl(_) | GatewayError::Other(_) => false,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout(e.to_string())
        } else if let Some(status) = e.status() {
            GatewayError::Status(status.as_u16())
        } else {
            GatewayError::Http(e.to_string())
        }
    }
}

/// Convenience alias for gateway results.
pub type GatewayResult<T> = Result<T, GatewayError>;
