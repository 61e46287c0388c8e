use std::time::Duration;

use clap::{ArgGroup, Parser};
use mercury_report::FeedId;

use super::{run_load, LoadConfig, LoadMode};
use crate::common::{CliError, Result, ServerArgs};

/// Run concurrent simulated validators against a Mercury server
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("mode").required(true).args(["start_block", "timestamp"])))]
pub struct Cmd {
    /// Feed id to request
    #[arg(long = "feed")]
    pub feed: FeedId,

    /// Number of concurrent validators
    #[arg(long = "validators", default_value = "4")]
    pub validators: usize,

    /// Requests per validator
    #[arg(long = "requests", default_value = "10")]
    pub requests: usize,

    /// Pause between requests of one validator, in milliseconds
    #[arg(long = "interval-ms", default_value = "0")]
    pub interval_ms: u64,

    /// Poll the v0.2 `/client` endpoint starting at this block
    #[arg(long = "start-block")]
    pub start_block: Option<u64>,

    /// Poll the v0.3 `/api/v1/reports` endpoint starting at this timestamp
    #[arg(long = "timestamp")]
    pub timestamp: Option<u64>,

    /// Exit with an error unless every request succeeds
    #[arg(long = "fail-on-error")]
    pub fail_on_error: bool,

    /// Server configuration
    #[command(flatten)]
    pub server: ServerArgs,
}

impl Cmd {
    /// Execute the load command
    pub async fn run(&self) -> Result<()> {
        let report = run_load(self.server.client()?, self.config()?).await;
        println!("{}", serde_json::to_string_pretty(&report)?);

        if self.fail_on_error && !report.is_clean() {
            return Err(CliError::LoadFailed { failed: report.total - report.ok, total: report.total });
        }
        Ok(())
    }

    /// Load configuration for these arguments.
    pub fn config(&self) -> Result<LoadConfig> {
        if self.validators == 0 {
            return Err(CliError::InvalidInput("--validators must be at least 1".to_string()));
        }
        let mode = match (self.start_block, self.timestamp) {
            (Some(start_block), _) => LoadMode::Legacy { start_block },
            (None, Some(timestamp)) => LoadMode::Latest { timestamp },
            (None, None) => {
                return Err(CliError::InvalidInput(
                    "--start-block or --timestamp is required".to_string(),
                ))
            }
        };
        Ok(LoadConfig {
            validators: self.validators,
            requests_per_validator: self.requests,
            interval: Duration::from_millis(self.interval_ms),
            feed: self.feed,
            mode,
        })
    }
}
