//! Dynamically typed view of a decoded report.

use std::collections::BTreeMap;

use alloy_primitives::{
    aliases::{I192, U192},
    B256,
};
use serde::Serialize;

/// A single report field, tagged with its ABI type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum ReportValue {
    /// `bytes32`
    Bytes32(B256),
    /// `int192`
    Int192(I192),
    /// `uint192`
    Uint192(U192),
    /// `uint64`
    Uint64(u64),
    /// `uint32`
    Uint32(u32),
}

impl ReportValue {
    /// Solidity name of the value's type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bytes32(_) => "bytes32",
            Self::Int192(_) => "int192",
            Self::Uint192(_) => "uint192",
            Self::Uint64(_) => "uint64",
            Self::Uint32(_) => "uint32",
        }
    }

    /// Returns the word if this is a `bytes32`.
    pub const fn as_bytes32(&self) -> Option<B256> {
        match self {
            Self::Bytes32(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if this is an `int192`.
    pub const fn as_int192(&self) -> Option<I192> {
        match self {
            Self::Int192(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if this is a `uint64`.
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint64(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if this is a `uint32`.
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Uint32(value) => Some(*value),
            _ => None,
        }
    }
}

/// Report fields keyed by their ABI names.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, derive_more::Deref, derive_more::DerefMut,
)]
#[serde(transparent)]
pub struct DecodedReport(BTreeMap<String, ReportValue>);

impl DecodedReport {
    /// Creates an empty report map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ReportValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>> FromIterator<(K, ReportValue)> for DecodedReport {
    fn from_iter<T: IntoIterator<Item = (K, ReportValue)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        let value = ReportValue::from(5u64);
        assert_eq!(value.as_u64(), Some(5));
        assert_eq!(value.as_u32(), None);
        assert_eq!(value.type_name(), "uint64");
    }

    #[test]
    fn test_serializes_untagged() {
        let report = DecodedReport::new().with("observationsTimestamp", 7u32);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "observationsTimestamp": 7 }));
    }
}
