//! `tracing` setup for mercury-cli.
//!
//! Logs go to stderr so that stdout carries only the JSON the commands print. Nothing is logged
//! unless `-v` is given or `RUST_LOG` is set; `RUST_LOG` overrides `-v` entirely. With
//! `--log.file` the output is redirected to a file, without ANSI escapes.

use std::{fs::File, path::PathBuf};

use clap::Args;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use super::Result;

/// Crates whose events `-v` enables.
const LOG_TARGETS: [&str; 3] = ["mercury_cli", "mercury_report", "oracle_requests"];

/// Logging flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Verbosity: -v errors, -vv warnings, -vvv info, -vvvv debug, -vvvvv trace
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long = "log.file", visible_aliases = ["log-file"], global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable ANSI colors on stderr
    #[arg(long = "log.no-color", visible_aliases = ["log-no-color"], global = true)]
    pub log_no_color: bool,
}

impl LogArgs {
    /// Installs the global subscriber. Fails if the log file cannot be created.
    pub fn init(&self) -> Result<()> {
        let filter = match std::env::var("RUST_LOG") {
            Ok(_) => EnvFilter::from_default_env(),
            Err(_) => EnvFilter::new(self.directives()),
        };
        // Event targets are noise until debugging.
        let builder = fmt().with_env_filter(filter).with_target(self.verbose >= 4);

        match &self.log_file {
            Some(path) => builder.with_writer(File::create(path)?).with_ansi(false).init(),
            None => builder.with_writer(std::io::stderr).with_ansi(!self.log_no_color).init(),
        }
        Ok(())
    }

    /// Filter directives selected by `-v`.
    pub fn directives(&self) -> String {
        if self.verbose == 0 {
            return "off".to_string();
        }
        let level = self.level();
        LOG_TARGETS.map(|target| format!("{target}={level}")).join(",")
    }

    /// Level selected by the `-v` count. Meaningless when `verbose` is zero.
    pub const fn level(&self) -> Level {
        match self.verbose {
            0 | 1 => Level::ERROR,
            2 => Level::WARN,
            3 => Level::INFO,
            4 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
