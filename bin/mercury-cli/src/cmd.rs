use clap::{Parser, Subcommand};

use crate::common::{CliError, LogArgs};

/// Command line of the mercury-cli tool
#[derive(Parser, Debug)]
#[command(version, about, infer_subcommands = true)]
pub struct Cli {
    /// Logging configuration
    #[command(flatten)]
    pub log: LogArgs,

    /// Command to run
    #[command(subcommand)]
    pub cmd: MainCmd,
}

/// Main command enumeration for the mercury-cli tool
#[derive(Subcommand, Debug)]
pub enum MainCmd {
    /// Decode a full report
    Decode(crate::decode::Cmd),
    /// Fetch a report from the HTTP API
    Fetch(crate::fetch::Cmd),
    /// Check the admin role
    Admin(crate::admin::Cmd),
    /// Read reports from the WebSocket stream
    Stream(crate::stream::Cmd),
    /// Run a load test
    Load(crate::load::Cmd),
    /// Manage the oracle request audit log
    Requests(crate::requests::Cmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command error
    #[error("{0}")]
    Cli(#[from] CliError),
}

impl Cli {
    /// Initialise logging and execute the selected command
    pub async fn run(&self) -> Result<(), Error> {
        self.log.init()?;
        self.cmd.run().await
    }
}

impl MainCmd {
    /// Execute the main command
    pub async fn run(&self) -> Result<(), Error> {
        match self {
            Self::Decode(cmd) => cmd.run()?,
            Self::Fetch(cmd) => cmd.run().await?,
            Self::Admin(cmd) => cmd.run().await?,
            Self::Stream(cmd) => cmd.run().await?,
            Self::Load(cmd) => cmd.run().await?,
            Self::Requests(cmd) => cmd.run()?,
        }
        Ok(())
    }
}
