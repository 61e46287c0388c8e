//! Constants shared by the report codec.

/// Number of 32-byte words in the OCR report context.
pub const REPORT_CONTEXT_WORDS: usize = 3;

/// Maximum number of signatures a full report can carry. Each signature's recovery id occupies
/// one byte of the 32-byte `rawVs` word.
pub const MAX_SIGNATURES: usize = 32;

/// Length in bytes of a feed id.
pub const FEED_ID_LENGTH: usize = 32;

/// Length in bytes of an encoded legacy report.
pub const LEGACY_REPORT_LENGTH: usize = 8 * 32;

/// Length in bytes of an encoded V1 report.
pub const V1_REPORT_LENGTH: usize = 9 * 32;

/// Feed id prefix of V1 reports.
pub const SCHEMA_VERSION_V1: u16 = 1;

/// Feed id prefix of V2 reports.
pub const SCHEMA_VERSION_V2: u16 = 2;

/// Feed id prefix of V3 reports.
pub const SCHEMA_VERSION_V3: u16 = 3;
