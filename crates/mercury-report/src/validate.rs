//! Shape checks for decoded reports.

use crate::{DecodedReport, ReportSchema};

/// Fields every legacy report must carry, with their ABI types.
const LEGACY_REQUIRED: &[(&str, &str)] = &[
    ("feedId", "bytes32"),
    ("median", "int192"),
    ("observationsBlocknumber", "uint64"),
    ("observationsTimestamp", "uint32"),
];

const V1_REQUIRED: &[(&str, &str)] = &[
    ("feedId", "bytes32"),
    ("observationsTimestamp", "uint32"),
    ("benchmarkPrice", "int192"),
    ("currentBlockNum", "uint64"),
    ("validFromBlockNum", "uint64"),
];

const V2_REQUIRED: &[(&str, &str)] = &[
    ("feedId", "bytes32"),
    ("validFromTimestamp", "uint32"),
    ("observationsTimestamp", "uint32"),
    ("expiresAt", "uint32"),
    ("benchmarkPrice", "int192"),
];

const V3_REQUIRED: &[(&str, &str)] = &[
    ("feedId", "bytes32"),
    ("validFromTimestamp", "uint32"),
    ("observationsTimestamp", "uint32"),
    ("expiresAt", "uint32"),
    ("benchmarkPrice", "int192"),
    ("bid", "int192"),
    ("ask", "int192"),
];

/// Why a decoded report failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required key is absent
    #[error("unpacked report has no '{0}'")]
    MissingField(&'static str),

    /// A required key holds a value of another type
    #[error("cannot cast {field} to {expected}, type is {actual}")]
    WrongType {
        /// The key
        field: &'static str,
        /// Required ABI type
        expected: &'static str,
        /// ABI type found
        actual: &'static str,
    },
}

/// Checks that a legacy report map carries `feedId`, `median`, `observationsBlocknumber` and
/// `observationsTimestamp` with their expected types.
///
/// Keys are checked in that order and the first problem is returned. Other keys are ignored.
pub fn validate_report(report: &DecodedReport) -> Result<(), ValidationError> {
    check_required(report, LEGACY_REQUIRED)
}

/// Like [`validate_report`], against the required fields of `schema`.
pub fn validate_report_for(
    schema: ReportSchema,
    report: &DecodedReport,
) -> Result<(), ValidationError> {
    match schema {
        ReportSchema::Legacy => validate_report(report),
        ReportSchema::V1 => check_required(report, V1_REQUIRED),
        ReportSchema::V2 => check_required(report, V2_REQUIRED),
        ReportSchema::V3 => check_required(report, V3_REQUIRED),
    }
}

fn check_required(
    report: &DecodedReport,
    required: &[(&'static str, &'static str)],
) -> Result<(), ValidationError> {
    for &(field, expected) in required {
        let value = report.get(field).ok_or(ValidationError::MissingField(field))?;
        if value.type_name() != expected {
            return Err(ValidationError::WrongType { field, expected, actual: value.type_name() });
        }
    }
    Ok(())
}
