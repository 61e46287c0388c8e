//! Report fixtures and signing helpers for tests.

use alloy_primitives::{aliases::U192, b256, Bytes, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::{FeedId, FullReport, LegacyReport, Report, ReportV2, ReportV3, I192};

/// `chainlinkBlob` served by the Mercury mock for `BTC-USD-ARBITRUM-TESTNET`.
pub const FIXTURE_BLOB: &str = "0x0001c38d71fed6c320b90e84b6f559459814d068e2a1700adc931ca9717d4fe70000000000000000000000000000000000000000000000000000000001a80b52b4bf1233f9cb71144a253a1791b202113c4ab4a92fa1b176d684b4959666ff8200000000000000000000000000000000000000000000000000000000000000e000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000260000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001004254432d5553442d415242495452554d2d544553544e45540000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000645570be000000000000000000000000000000000000000000000000000002af2b818dc5000000000000000000000000000000000000000000000000000002af2426faf3000000000000000000000000000000000000000000000000000002af32dc209700000000000000000000000000000000000000000000000000000000012130f8df0a9745bb6ad5e2df605e158ba8ad8a33ef8a0acf9851f0f01668a3a3f2b68600000000000000000000000000000000000000000000000000000000012130f60000000000000000000000000000000000000000000000000000000000000002c4a7958dce105089cf5edb68dad7dcfe8618d7784eb397f97d5a5fade78c11a58275aebda478968e545f7e3657aba9dcbe8d44605e4c6fde3e24edd5e22c94270000000000000000000000000000000000000000000000000000000000000002459c12d33986018a8959566d145225f0c4a4e61a9a3f50361ccff397899314f0018162cf10cd89897635a0bb62a822355bd199d09f4abe76e4d05261bb44733d";

/// `fullReport` served by the Mercury mock's `/api/v1/reports/bulk` endpoint: a V1 report for
/// `ETH-USD-ARBITRUM-TESTNET`, signed twice.
pub const V1_FIXTURE_BLOB: &str = "0x00066dfcd1ed2d95b18c948dbc5bd64c687afe93e4ca7d663ddec14c20090ad80000000000000000000000000000000000000000000000000000000000081401000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000e000000000000000000000000000000000000000000000000000000000000002200000000000000000000000000000000000000000000000000000000000000280000100000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001204554482d5553442d415242495452554d2d544553544e455400000000000000000000000000000000000000000000000000000000000000000000000064891c98000000000000000000000000000000000000000000000000000000289ad8d367000000000000000000000000000000000000000000000000000000289acf0b38000000000000000000000000000000000000000000000000000000289b3da40000000000000000000000000000000000000000000000000000000000018ae7ce74d9fa252a8983976eab600dc7590c778d04813430841bc6e765c34cd81a168d00000000000000000000000000000000000000000000000000000000018ae7cb0000000000000000000000000000000000000000000000000000000064891c98000000000000000000000000000000000000000000000000000000000000000260412b94e525ca6cedc9f544fd86f77606d52fe731a5d069dbe836a8bfc0fb8c911963b0ae7a14971f3b4621bffb802ef0605392b9a6c89c7fab1df8633a5ade00000000000000000000000000000000000000000000000000000000000000024500c2f521f83fba5efc2bf3effaaedde43d0a4adff785c1213b712a3aed0d8157642a84324db0cf9695ebd27708d4608eb0337e0dd87b0e43f0fa70c700d911";

/// Legacy feed id: ASCII `ETH-USD-ARBITRUM-TESTNET`.
pub const LEGACY_FEED: FeedId = FeedId::new(
    b256!("0x4554482d5553442d415242495452554d2d544553544e45540000000000000000").0,
);

/// V2 feed id.
pub const V2_FEED: FeedId = FeedId::new(
    b256!("0x00028c915d6af0fd66bba2d0fc9405226bca8d6806333121a7d9832103d1563c").0,
);

/// V3 feed id.
pub const V3_FEED: FeedId = FeedId::new(
    b256!("0x00038c915d6af0fd66bba2d0fc9405226bca8d6806333121a7d9832103d1563c").0,
);

/// Report context used by [`sign_report`].
pub const TEST_CONTEXT: [B256; 3] = [
    b256!("0x0001c38d71fed6c320b90e84b6f559459814d068e2a1700adc931ca9717d4fe7"),
    b256!("0x0000000000000000000000000000000000000000000000000000000001a80b52"),
    b256!("0x0000000000000000000000000000000000000000000000000000000000000000"),
];

/// Decodes [`FIXTURE_BLOB`].
pub fn fixture_full_report() -> FullReport {
    FullReport::from_hex(FIXTURE_BLOB).expect("fixture blob decodes")
}

/// Decodes [`V1_FIXTURE_BLOB`].
pub fn v1_fixture_full_report() -> FullReport {
    FullReport::from_hex(V1_FIXTURE_BLOB).expect("v1 fixture blob decodes")
}

/// Builds a legacy report.
pub fn legacy_report(feed: FeedId, block: u64, timestamp: u32, median: i64) -> LegacyReport {
    let median = I192::try_from(median).expect("median fits in int192");
    LegacyReport {
        feedId: *feed.as_b256(),
        observationsTimestamp: timestamp,
        median,
        bid: median,
        ask: median,
        observationsBlocknumber: block,
        observationsBlockhash: B256::repeat_byte(0x11),
        validFromBlocknum: block.saturating_sub(2),
    }
}

/// Builds a V2 report.
pub fn v2_report(feed: FeedId, timestamp: u32, price: i64) -> ReportV2 {
    let price = I192::try_from(price).expect("price fits in int192");
    ReportV2 {
        feedId: *feed.as_b256(),
        validFromTimestamp: timestamp.saturating_sub(1),
        observationsTimestamp: timestamp,
        nativeFee: U192::from(2_100_000_000_000_000_000u64),
        linkFee: U192::from(1_100_000_000_000_000_000u64),
        expiresAt: timestamp.saturating_add(86_400),
        benchmarkPrice: price,
    }
}

/// Builds a V3 report.
pub fn v3_report(feed: FeedId, timestamp: u32, price: i64) -> ReportV3 {
    let price = I192::try_from(price).expect("price fits in int192");
    ReportV3 {
        feedId: *feed.as_b256(),
        validFromTimestamp: timestamp.saturating_sub(1),
        observationsTimestamp: timestamp,
        nativeFee: U192::from(2_100_000_000_000_000_000u64),
        linkFee: U192::from(1_100_000_000_000_000_000u64),
        expiresAt: timestamp.saturating_add(86_400),
        benchmarkPrice: price,
        bid: price,
        ask: price,
    }
}

/// Deterministic signer number `n`.
pub fn signer(n: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::with_last_byte(n)).expect("valid private key")
}

/// Wraps `report` in a full report signed by every signer in `signers`.
pub fn sign_report(report: &Report, signers: &[PrivateKeySigner]) -> FullReport {
    let mut full = FullReport {
        report_context: TEST_CONTEXT,
        report_blob: Bytes::from(report.encode()),
        raw_rs: Vec::with_capacity(signers.len()),
        raw_ss: Vec::with_capacity(signers.len()),
        raw_vs: B256::ZERO,
    };
    let hash = full.signing_hash();
    for (index, signer) in signers.iter().enumerate() {
        let signature = signer.sign_hash_sync(&hash).expect("signing succeeds");
        full.raw_rs.push(B256::from(signature.r().to_be_bytes::<32>()));
        full.raw_ss.push(B256::from(signature.s().to_be_bytes::<32>()));
        full.raw_vs[index] = u8::from(signature.v());
    }
    full
}
