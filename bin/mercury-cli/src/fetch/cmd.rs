use clap::{ArgGroup, Parser};
use mercury_report::FeedId;
use tracing::info;

use crate::common::{CliError, ReportSummary, Result, ServerArgs};

/// Fetch a report for a feed
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("at").required(true).args(["block", "timestamp"])))]
pub struct Cmd {
    /// Feed id (0x-prefixed, 32 bytes)
    #[arg(long = "feed")]
    pub feed: FeedId,

    /// Block number, for the v0.2 `/client` endpoint
    #[arg(long = "block")]
    pub block: Option<u64>,

    /// Unix timestamp, for the v0.3 `/api/v1/reports` endpoint
    #[arg(long = "timestamp")]
    pub timestamp: Option<u64>,

    /// Recover the addresses that signed the report
    #[arg(long = "signers")]
    pub signers: bool,

    /// Server configuration
    #[command(flatten)]
    pub server: ServerArgs,
}

impl Cmd {
    /// Execute the fetch command
    pub async fn run(&self) -> Result<()> {
        let client = self.server.client()?;
        let full = match (self.block, self.timestamp) {
            (Some(block), _) => client.get_legacy_report(self.feed, block).await?,
            (None, Some(timestamp)) => client.get_report(self.feed, timestamp).await?.decode()?,
            (None, None) => {
                return Err(CliError::InvalidInput("--block or --timestamp is required".into()))
            }
        };
        let summary = ReportSummary::new(&full, None, self.signers)?;
        info!(feed = %self.feed, valid = summary.valid, "fetched report");
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}
