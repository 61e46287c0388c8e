use alloy_primitives::hex::FromHexError;
use mercury_report::{ReportError, ValidationError};
use oracle_requests::StoreError;

use crate::client::ClientError;

/// Error types shared by the mercury-cli commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Mercury server error
    #[error("{0}")]
    Client(#[from] ClientError),

    /// Report decoding error
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Report validation error
    #[error("Invalid report: {0}")]
    Validation(#[from] ValidationError),

    /// Oracle request store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Failed to read file
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A load run finished with failures
    #[error("Load run failed: {failed} of {total} requests failed")]
    LoadFailed {
        /// Failed requests
        failed: usize,
        /// Total requests
        total: usize,
    },
}

/// Result type for the mercury-cli commands
pub type Result<T> = std::result::Result<T, CliError>;
