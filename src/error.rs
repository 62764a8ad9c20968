//! Dashboard error types
//!
//! Defines the errors surfaced by the frame pipeline, the summary fetches
//! and the stream connection.

use thiserror::Error;

/// Errors that can occur in the dashboard client
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A frame or response body was not valid JSON for the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport failure on an HTTP request
    #[cfg(feature = "native")]
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[cfg(feature = "native")]
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// WebSocket connect or read failure
    #[cfg(feature = "native")]
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// Base URL is not an http(s) URL
    #[cfg(feature = "native")]
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// The stream could not be re-established
    #[cfg(feature = "native")]
    #[error("Gave up reconnecting after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    /// Configuration file error
    #[cfg(feature = "native")]
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

#[cfg(feature = "native")]
impl From<tokio_tungstenite::tungstenite::Error> for DashboardError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        DashboardError::WebSocket(Box::new(err))
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
