//! Feed identifiers and the report schema they select.

use core::{fmt, str::FromStr};

use alloy_primitives::{hex, B256};
use serde::{Deserialize, Serialize};

use crate::constants::{SCHEMA_VERSION_V1, SCHEMA_VERSION_V2, SCHEMA_VERSION_V3};

/// Layout of the report carried for a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSchema {
    /// Block-number based report served by the v0.2 `/client` endpoint.
    Legacy,
    /// Block-number based report with a benchmark price, served by the v0.3 API.
    V1,
    /// Timestamp based report with fees and a benchmark price.
    V2,
    /// [`ReportSchema::V2`] plus bid and ask.
    V3,
}

impl ReportSchema {
    /// Maps a feed id version prefix to a schema. Unknown prefixes are legacy feeds, whose ids
    /// are plain ASCII names.
    pub const fn from_version(version: u16) -> Self {
        match version {
            SCHEMA_VERSION_V1 => Self::V1,
            SCHEMA_VERSION_V2 => Self::V2,
            SCHEMA_VERSION_V3 => Self::V3,
            _ => Self::Legacy,
        }
    }

    /// Lowercase schema name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }
}

impl fmt::Display for ReportSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 32-byte Mercury feed id.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Into,
)]
#[serde(transparent)]
pub struct FeedId(B256);

impl FeedId {
    /// Creates a feed id from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    /// Returns the underlying word.
    pub const fn as_b256(&self) -> &B256 {
        &self.0
    }

    /// Big-endian version prefix stored in the first two bytes.
    pub const fn version(&self) -> u16 {
        u16::from_be_bytes([self.0 .0[0], self.0 .0[1]])
    }

    /// Schema of the reports published for this feed.
    pub const fn schema(&self) -> ReportSchema {
        ReportSchema::from_version(self.version())
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_prefixed(self.0))
    }
}

impl FromStr for FeedId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s.trim()).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0x00028c915d6af0fd66bba2d0fc9405226bca8d6806333121a7d9832103d1563c", ReportSchema::V2)]
    #[case("0x00038c915d6af0fd66bba2d0fc9405226bca8d6806333121a7d9832103d1563c", ReportSchema::V3)]
    #[case("0x4554482d5553442d415242495452554d2d544553544e45540000000000000000", ReportSchema::Legacy)]
    #[case("0x0001c38d71fed6c320b90e84b6f559459814d068e2a1700adc931ca9717d4fe7", ReportSchema::V1)]
    #[case("0x0004c38d71fed6c320b90e84b6f559459814d068e2a1700adc931ca9717d4fe7", ReportSchema::Legacy)]
    fn test_schema_from_prefix(#[case] feed: &str, #[case] expected: ReportSchema) {
        let feed: FeedId = feed.parse().unwrap();
        assert_eq!(feed.schema(), expected);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let text = "0x4254432d5553442d415242495452554d2d544553544e45540000000000000000";
        let feed: FeedId = text.parse().unwrap();
        assert_eq!(feed.to_string(), text);
        let unprefixed: FeedId = text.trim_start_matches("0x").parse().unwrap();
        assert_eq!(unprefixed, feed);
    }

    #[test]
    fn test_rejects_short_id() {
        assert!("0x1234".parse::<FeedId>().is_err());
    }
}
