//! Report schemas and their decoding.

use alloy_primitives::{aliases::I192, B256};
use alloy_sol_types::{sol, SolType};

use crate::{
    constants::{FEED_ID_LENGTH, V1_REPORT_LENGTH},
    DecodedReport, FeedId, ReportError, ReportSchema, Result,
};

sol! {
    /// Block-number based report served by the v0.2 `/client` endpoint.
    #[derive(Debug, PartialEq, Eq)]
    struct LegacyReport {
        bytes32 feedId;
        uint32 observationsTimestamp;
        int192 median;
        int192 bid;
        int192 ask;
        uint64 observationsBlocknumber;
        bytes32 observationsBlockhash;
        uint64 validFromBlocknum;
    }

    /// Block-number based report with a benchmark price and the block it was observed at.
    #[derive(Debug, PartialEq, Eq)]
    struct ReportV1 {
        bytes32 feedId;
        uint32 observationsTimestamp;
        int192 benchmarkPrice;
        int192 bid;
        int192 ask;
        uint64 currentBlockNum;
        bytes32 currentBlockHash;
        uint64 validFromBlockNum;
        uint64 currentBlockTimestamp;
    }

    /// Timestamp based report carrying verification fees.
    #[derive(Debug, PartialEq, Eq)]
    struct ReportV2 {
        bytes32 feedId;
        uint32 validFromTimestamp;
        uint32 observationsTimestamp;
        uint192 nativeFee;
        uint192 linkFee;
        uint32 expiresAt;
        int192 benchmarkPrice;
    }

    /// [`ReportV2`] with bid and ask prices.
    #[derive(Debug, PartialEq, Eq)]
    struct ReportV3 {
        bytes32 feedId;
        uint32 validFromTimestamp;
        uint32 observationsTimestamp;
        uint192 nativeFee;
        uint192 linkFee;
        uint32 expiresAt;
        int192 benchmarkPrice;
        int192 bid;
        int192 ask;
    }
}

/// A decoded report of any supported schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Block-number based report.
    Legacy(LegacyReport),
    /// V1 report.
    V1(ReportV1),
    /// V2 report.
    V2(ReportV2),
    /// V3 report.
    V3(ReportV3),
}

impl Report {
    /// Decodes `data` as a report of the given schema.
    pub fn decode(schema: ReportSchema, data: &[u8]) -> Result<Self> {
        Ok(match schema {
            ReportSchema::Legacy => Self::Legacy(<LegacyReport as SolType>::abi_decode(data, true)?),
            ReportSchema::V1 => Self::V1(<ReportV1 as SolType>::abi_decode(data, true)?),
            ReportSchema::V2 => Self::V2(<ReportV2 as SolType>::abi_decode(data, true)?),
            ReportSchema::V3 => Self::V3(<ReportV3 as SolType>::abi_decode(data, true)?),
        })
    }

    /// Decodes `data`, choosing the schema from the feed id in its first word.
    ///
    /// V1 reports were also published for ASCII-named feeds, so a report under a legacy feed id
    /// is decoded as V1 when it has the V1 length.
    pub fn decode_auto(data: &[u8]) -> Result<Self> {
        let schema = match Self::peek_feed_id(data)?.schema() {
            ReportSchema::Legacy if data.len() == V1_REPORT_LENGTH => ReportSchema::V1,
            schema => schema,
        };
        Self::decode(schema, data)
    }

    /// Reads the feed id without decoding the rest of the report.
    pub fn peek_feed_id(data: &[u8]) -> Result<FeedId> {
        let word = data.get(..FEED_ID_LENGTH).ok_or(ReportError::ReportTooShort(data.len()))?;
        Ok(B256::from_slice(word).into())
    }

    /// ABI-encodes the report.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Legacy(report) => <LegacyReport as SolType>::abi_encode(report),
            Self::V1(report) => <ReportV1 as SolType>::abi_encode(report),
            Self::V2(report) => <ReportV2 as SolType>::abi_encode(report),
            Self::V3(report) => <ReportV3 as SolType>::abi_encode(report),
        }
    }

    /// Schema of this report.
    pub const fn schema(&self) -> ReportSchema {
        match self {
            Self::Legacy(_) => ReportSchema::Legacy,
            Self::V1(_) => ReportSchema::V1,
            Self::V2(_) => ReportSchema::V2,
            Self::V3(_) => ReportSchema::V3,
        }
    }

    /// Feed the report was produced for.
    pub fn feed_id(&self) -> FeedId {
        match self {
            Self::Legacy(report) => report.feedId.into(),
            Self::V1(report) => report.feedId.into(),
            Self::V2(report) => report.feedId.into(),
            Self::V3(report) => report.feedId.into(),
        }
    }

    /// Timestamp of the observations the report aggregates.
    pub const fn observations_timestamp(&self) -> u32 {
        match self {
            Self::Legacy(report) => report.observationsTimestamp,
            Self::V1(report) => report.observationsTimestamp,
            Self::V2(report) => report.observationsTimestamp,
            Self::V3(report) => report.observationsTimestamp,
        }
    }

    /// The headline price: the median for legacy reports, the benchmark price otherwise.
    pub const fn price(&self) -> I192 {
        match self {
            Self::Legacy(report) => report.median,
            Self::V1(report) => report.benchmarkPrice,
            Self::V2(report) => report.benchmarkPrice,
            Self::V3(report) => report.benchmarkPrice,
        }
    }

    /// Flattens the report into a map keyed by ABI field name.
    pub fn to_map(&self) -> DecodedReport {
        match self {
            Self::Legacy(r) => DecodedReport::new()
                .with("feedId", r.feedId)
                .with("observationsTimestamp", r.observationsTimestamp)
                .with("median", r.median)
                .with("bid", r.bid)
                .with("ask", r.ask)
                .with("observationsBlocknumber", r.observationsBlocknumber)
                .with("observationsBlockhash", r.observationsBlockhash)
                .with("validFromBlocknum", r.validFromBlocknum),
            Self::V1(r) => DecodedReport::new()
                .with("feedId", r.feedId)
                .with("observationsTimestamp", r.observationsTimestamp)
                .with("benchmarkPrice", r.benchmarkPrice)
                .with("bid", r.bid)
                .with("ask", r.ask)
                .with("currentBlockNum", r.currentBlockNum)
                .with("currentBlockHash", r.currentBlockHash)
                .with("validFromBlockNum", r.validFromBlockNum)
                .with("currentBlockTimestamp", r.currentBlockTimestamp),
            Self::V2(r) => DecodedReport::new()
                .with("feedId", r.feedId)
                .with("validFromTimestamp", r.validFromTimestamp)
                .with("observationsTimestamp", r.observationsTimestamp)
                .with("nativeFee", r.nativeFee)
                .with("linkFee", r.linkFee)
                .with("expiresAt", r.expiresAt)
                .with("benchmarkPrice", r.benchmarkPrice),
            Self::V3(r) => DecodedReport::new()
                .with("feedId", r.feedId)
                .with("validFromTimestamp", r.validFromTimestamp)
                .with("observationsTimestamp", r.observationsTimestamp)
                .with("nativeFee", r.nativeFee)
                .with("linkFee", r.linkFee)
                .with("expiresAt", r.expiresAt)
                .with("benchmarkPrice", r.benchmarkPrice)
                .with("bid", r.bid)
                .with("ask", r.ask),
        }
    }
}

impl From<LegacyReport> for Report {
    fn from(report: LegacyReport) -> Self {
        Self::Legacy(report)
    }
}

impl From<ReportV1> for Report {
    fn from(report: ReportV1) -> Self {
        Self::V1(report)
    }
}

impl From<ReportV2> for Report {
    fn from(report: ReportV2) -> Self {
        Self::V2(report)
    }
}

impl From<ReportV3> for Report {
    fn from(report: ReportV3) -> Self {
        Self::V3(report)
    }
}

impl From<&Report> for DecodedReport {
    fn from(report: &Report) -> Self {
        report.to_map()
    }
}

/// Decodes a legacy report straight into its map form.
pub fn decode_report(data: &[u8]) -> Result<DecodedReport> {
    Report::decode(ReportSchema::Legacy, data).map(|report| report.to_map())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{
            legacy_report, v1_fixture_full_report, v2_report, v3_report, LEGACY_FEED, V2_FEED,
            V3_FEED,
        },
        validate_report_for,
    };

    #[test]
    fn test_legacy_report_round_trip_keeps_fields() {
        let report = Report::from(legacy_report(LEGACY_FEED, 1_000, 1_700_000_000, 42));
        let encoded = report.encode();
        assert_eq!(encoded.len(), 8 * 32);

        let decoded = Report::decode_auto(&encoded).unwrap();
        assert_eq!(decoded, report);
        assert_eq!(decoded.schema(), ReportSchema::Legacy);
        assert_eq!(decoded.observations_timestamp(), 1_700_000_000);
        assert_eq!(decoded.price(), I192::try_from(42i64).unwrap());
    }

    #[test]
    fn test_v3_selected_from_feed_prefix() {
        let encoded = Report::from(v3_report(V3_FEED, 1_700_000_000, -7)).encode();
        let decoded = Report::decode_auto(&encoded).unwrap();
        assert_eq!(decoded.schema(), ReportSchema::V3);
        assert_eq!(decoded.feed_id(), V3_FEED);
        assert_eq!(decoded.price(), I192::try_from(-7i64).unwrap());
    }

    #[test]
    fn test_map_carries_abi_names() {
        let map = Report::from(legacy_report(LEGACY_FEED, 9, 5, 1)).to_map();
        assert_eq!(map.len(), 8);
        assert_eq!(map["observationsBlocknumber"].as_u64(), Some(9));
        assert_eq!(map["observationsTimestamp"].as_u32(), Some(5));
        assert_eq!(map["feedId"].as_bytes32(), Some(*LEGACY_FEED.as_b256()));
    }

    #[test]
    fn test_short_report_rejected() {
        assert!(matches!(Report::decode_auto(&[0u8; 16]), Err(ReportError::ReportTooShort(16))));
    }

    #[test]
    fn test_truncated_report_is_abi_error() {
        let mut encoded = Report::from(v3_report(V3_FEED, 1, 1)).encode();
        encoded.truncate(5 * 32);
        assert!(matches!(Report::decode_auto(&encoded), Err(ReportError::Abi(_))));
    }

    #[test]
    fn test_decode_fixture_blob_report() {
        // Report embedded in the mock server's `/client` fixture.
        let report = crate::test_utils::fixture_full_report().report_auto().unwrap();
        let Report::Legacy(legacy) = &report else { panic!("expected legacy report") };
        assert_eq!(legacy.observationsTimestamp, 0x645570be);
        assert_eq!(legacy.observationsBlocknumber, 0x12130f8);
        assert_eq!(legacy.validFromBlocknum, 0x12130f6);
        assert_eq!(legacy.median, I192::try_from(0x2af2b818dc5i64).unwrap());
    }

    #[test]
    fn test_v1_fixture_under_ascii_feed_decodes_as_v1() {
        // Served by the mock `/api/v1/reports/bulk` endpoint for ETH-USD-ARBITRUM-TESTNET.
        let full = v1_fixture_full_report();
        assert_eq!(full.report_blob.len(), 9 * 32);

        let report = full.report_auto().unwrap();
        assert_eq!(report.schema(), ReportSchema::V1);
        assert_eq!(report.feed_id(), LEGACY_FEED);
        let Report::V1(v1) = &report else { panic!("expected V1 report") };
        assert_eq!(v1.observationsTimestamp, 0x64891c98);
        assert_eq!(v1.benchmarkPrice, I192::try_from(0x289ad8d367i64).unwrap());
        assert_eq!(v1.bid, I192::try_from(0x289acf0b38i64).unwrap());
        assert_eq!(v1.ask, I192::try_from(0x289b3da400i64).unwrap());
        assert_eq!(v1.currentBlockNum, 0x18ae7ce);
        assert_eq!(v1.validFromBlockNum, 0x18ae7cb);
        assert_eq!(v1.currentBlockTimestamp, 0x64891c98);

        validate_report_for(ReportSchema::V1, &report.to_map()).unwrap();
        assert!(full.report(ReportSchema::Legacy).is_err());
    }

    #[test]
    fn test_legacy_length_under_ascii_feed_stays_legacy() {
        let encoded = Report::from(legacy_report(LEGACY_FEED, 1, 2, 3)).encode();
        assert_eq!(Report::decode_auto(&encoded).unwrap().schema(), ReportSchema::Legacy);
    }

    #[test]
    fn test_v2_round_trip() {
        let report = Report::from(v2_report(V2_FEED, 1_700_000_000, 1_234));
        let encoded = report.encode();
        assert_eq!(encoded.len(), 7 * 32);

        let decoded = Report::decode_auto(&encoded).unwrap();
        assert_eq!(decoded, report);
        assert_eq!(decoded.schema(), ReportSchema::V2);
        assert_eq!(decoded.price(), I192::try_from(1_234i64).unwrap());

        let map = decoded.to_map();
        assert_eq!(map.len(), 7);
        assert_eq!(map["expiresAt"].as_u32(), Some(1_700_086_400));
        validate_report_for(ReportSchema::V2, &map).unwrap();
        assert!(validate_report_for(ReportSchema::V3, &map).is_err());
    }
}
