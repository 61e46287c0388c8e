use alloy_primitives::B256;

/// Errors raised by the oracle request store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite error
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// The database was written by an unknown schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedVersion(i64),

    /// A request with this id is already recorded
    #[error("Duplicate request: {0}")]
    DuplicateRequest(B256),

    /// No request with this id
    #[error("Request not found: {0}")]
    NotFound(B256),

    /// A stored row does not decode
    #[error("Corrupt row {id}: {reason}")]
    CorruptRow {
        /// Row id
        id: i64,
        /// What was wrong
        reason: String,
    },
}

/// Result type for the oracle request store.
pub type Result<T> = std::result::Result<T, StoreError>;
