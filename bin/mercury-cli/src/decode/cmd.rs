use clap::{Parser, ValueEnum};
use mercury_report::{FullReport, ReportSchema};
use tracing::info;

use crate::common::{load_hex, CliError, ReportSummary, Result};

/// Schema selection for `decode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SchemaArg {
    /// Pick the schema from the feed id prefix
    #[default]
    Auto,
    /// Block-number based v0.2 report
    Legacy,
    /// V1 report
    V1,
    /// V2 report
    V2,
    /// V3 report
    V3,
}

impl SchemaArg {
    /// The explicit schema, or `None` for auto detection.
    pub const fn schema(self) -> Option<ReportSchema> {
        match self {
            Self::Auto => None,
            Self::Legacy => Some(ReportSchema::Legacy),
            Self::V1 => Some(ReportSchema::V1),
            Self::V2 => Some(ReportSchema::V2),
            Self::V3 => Some(ReportSchema::V3),
        }
    }
}

/// Decode a hex-encoded full report
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Full report as hex string (positional argument)
    #[arg(value_name = "HEX")]
    pub report: Option<String>,

    /// File containing the full report. If '-' is specified, it is read from stdin
    #[arg(long = "file")]
    pub file: Option<String>,

    /// Report schema
    #[arg(long = "schema", value_enum, default_value_t = SchemaArg::Auto)]
    pub schema: SchemaArg,

    /// Recover the addresses that signed the report
    #[arg(long = "signers")]
    pub signers: bool,

    /// Fail if the report does not validate
    #[arg(long = "strict")]
    pub strict: bool,
}

impl Cmd {
    /// Execute the decode command
    pub fn run(&self) -> Result<()> {
        let summary = self.summarize()?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    /// Decodes the input into a summary.
    pub fn summarize(&self) -> Result<ReportSummary> {
        let bytes = load_hex(self.report.as_deref(), self.file.as_deref())?.ok_or_else(|| {
            CliError::InvalidInput("a report argument or --file is required".to_string())
        })?;
        let full = FullReport::decode(&bytes)?;
        let summary = ReportSummary::new(&full, self.schema.schema(), self.signers)?;
        info!(feed = %summary.feed_id, schema = %summary.schema, valid = summary.valid, "decoded report");

        if self.strict {
            if let Some(reason) = &summary.validation_error {
                return Err(CliError::InvalidInput(reason.clone()));
            }
        }
        Ok(summary)
    }
}
