use alloy_primitives::{Address, B256};
use mercury_report::{
    validate_report_for, DecodedReport, FeedId, FullReport, ReportSchema,
};
use serde::Serialize;

use super::Result;

/// Printable view of a full report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Digest of the producing OCR configuration.
    pub config_digest: B256,
    /// OCR epoch.
    pub epoch: u32,
    /// OCR round.
    pub round: u8,
    /// Feed of the embedded report.
    pub feed_id: FeedId,
    /// Schema the report was decoded with.
    pub schema: ReportSchema,
    /// Report fields.
    pub report: DecodedReport,
    /// Whether the report passed validation.
    pub valid: bool,
    /// Validation failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
    /// Number of attached signatures.
    pub signatures: usize,
    /// Recovered signers, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<Address>>,
}

impl ReportSummary {
    /// Decodes and validates `full`. The schema is taken from the feed id unless given.
    pub fn new(
        full: &FullReport,
        schema: Option<ReportSchema>,
        recover_signers: bool,
    ) -> Result<Self> {
        let report = match schema {
            Some(schema) => full.report(schema)?,
            None => full.report_auto()?,
        };
        let map = report.to_map();
        let validation_error =
            validate_report_for(report.schema(), &map).err().map(|err| err.to_string());
        let (epoch, round) = full.epoch_and_round();

        Ok(Self {
            config_digest: full.config_digest(),
            epoch,
            round,
            feed_id: report.feed_id(),
            schema: report.schema(),
            report: map,
            valid: validation_error.is_none(),
            validation_error,
            signatures: full.signature_count(),
            signers: recover_signers.then(|| full.signers()).transpose()?,
        })
    }
}
