use std::path::PathBuf;

use alloy_primitives::B256;
use clap::{Parser, Subcommand};
use oracle_requests::{OracleRequest, OracleRequestStore};
use serde_json::json;
use tracing::info;

use crate::common::{read_input, Result};

/// Manage the oracle request audit log
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Path of the SQLite database
    #[arg(
        long = "db",
        env = "ORACLE_REQUESTS_DB",
        default_value = "oracle_requests.db",
        global = true
    )]
    pub db: PathBuf,

    /// Action to perform
    #[command(subcommand)]
    pub action: Action,
}

/// Audit log actions
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Create or upgrade the schema
    Migrate,
    /// Record requests from a JSON file (an object or an array of objects); '-' reads stdin
    Record {
        /// Input file
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// List the requests of a subscription
    List {
        /// Subscription id
        #[arg(long = "subscription")]
        subscription: u64,
    },
    /// Stamp the fulfilment time of a request
    Fulfill {
        /// Request id
        #[arg(long = "request-id")]
        request_id: B256,
        /// Unix seconds
        #[arg(long = "at")]
        at: u64,
    },
}

impl Cmd {
    /// Execute the requests command
    pub fn run(&self) -> Result<()> {
        let mut store = OracleRequestStore::open(&self.db)?;
        match &self.action {
            Action::Migrate => {
                let version = store.schema_version()?;
                info!(db = %self.db.display(), ?version, "schema up to date");
                println!("{}", json!({ "db": self.db, "schemaVersion": version }));
            }
            Action::Record { file } => {
                let requests = parse_requests(&read_input(file)?)?;
                store.insert_all(&requests)?;
                println!("{}", json!({ "recorded": requests.len(), "total": store.count()? }));
            }
            Action::List { subscription } => {
                let requests = store.list_by_subscription(*subscription)?;
                println!("{}", serde_json::to_string_pretty(&requests)?);
            }
            Action::Fulfill { request_id, at } => {
                store.mark_fulfilled(*request_id, *at)?;
                println!("{}", json!({ "requestId": request_id, "fulfilledAt": at }));
            }
        }
        Ok(())
    }
}

/// Accepts a single request object or an array of them.
pub fn parse_requests(input: &str) -> Result<Vec<OracleRequest>> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    Ok(if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    })
}
