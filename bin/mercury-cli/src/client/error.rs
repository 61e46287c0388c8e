use mercury_report::ReportError;
use tokio_tungstenite::tungstenite::{self, http::header::InvalidHeaderValue};

/// Errors raised while talking to a Mercury server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// Malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Header value that cannot be sent
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    /// Client key rejected by HMAC
    #[error("Invalid client key")]
    InvalidKey,

    /// Non-success response
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Undecodable message body
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// Undecodable report payload
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Result type for the Mercury clients.
pub type Result<T> = std::result::Result<T, ClientError>;
