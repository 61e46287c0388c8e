use alloy_primitives::{hex::FromHexError, Address, SignatureError};

/// Errors raised while decoding a full report or recovering its signers.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// ABI decoding failed
    #[error("ABI decode error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// The report is shorter than a feed id
    #[error("Report too short: {0} bytes")]
    ReportTooShort(usize),

    /// The `r` and `s` arrays differ in length
    #[error("Mismatched signature arrays: {rs} r values, {ss} s values")]
    SignatureCountMismatch {
        /// Number of `r` values
        rs: usize,
        /// Number of `s` values
        ss: usize,
    },

    /// More signatures than `rawVs` can describe
    #[error("Too many signatures: {0}")]
    TooManySignatures(usize),

    /// A recovery id other than 0 or 1
    #[error("Invalid signature parity {v} at index {index}")]
    InvalidParity {
        /// Signature index
        index: usize,
        /// Offending `v` byte
        v: u8,
    },

    /// Public key recovery failed
    #[error("Signature recovery failed: {0}")]
    Recovery(#[from] SignatureError),

    /// The same oracle signed twice
    #[error("Duplicate signer: {0}")]
    DuplicateSigner(Address),

    /// A signature from an address outside the allowed set
    #[error("Unauthorized signer: {0}")]
    UnauthorizedSigner(Address),

    /// Fewer than `f + 1` signatures
    #[error("Not enough signatures: got {got}, need {need}")]
    InsufficientSignatures {
        /// Distinct valid signers
        got: usize,
        /// Required signers
        need: usize,
    },
}

/// Result type for report decoding.
pub type Result<T> = std::result::Result<T, ReportError>;
