//! Schema migration for the `oracle_requests` table.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::{Result, StoreError};

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_ORACLE_REQUESTS: &str = "
CREATE TABLE IF NOT EXISTS oracle_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id BLOB NOT NULL UNIQUE CHECK (length(request_id) = 32),
    contract_address BLOB NOT NULL CHECK (length(contract_address) = 20),
    subscription_id INTEGER NOT NULL,
    subscription_owner BLOB NOT NULL CHECK (length(subscription_owner) = 20),
    job_id BLOB NOT NULL CHECK (length(job_id) = 32),
    payment TEXT NOT NULL,
    callback_address BLOB NOT NULL CHECK (length(callback_address) = 20),
    callback_gas_limit INTEGER NOT NULL,
    tx_hash BLOB NOT NULL CHECK (length(tx_hash) = 32),
    created_at INTEGER NOT NULL,
    fulfilled_at INTEGER
);
CREATE INDEX IF NOT EXISTS idx_oracle_requests_subscription_id
    ON oracle_requests (subscription_id);";

/// Brings the schema up to [`SCHEMA_VERSION`].
///
/// A fresh database gets the full schema; a database already at the current version is left
/// untouched. Any other recorded version is rejected.
pub fn migrate(connection: &mut Connection) -> Result<()> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS schema_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> =
        tx.query_row("SELECT version FROM schema_meta LIMIT 1", params![], |row| row.get(0))
            .optional()?;
    match version {
        None => {
            tx.execute_batch(CREATE_ORACLE_REQUESTS)?;
            tx.execute("INSERT INTO schema_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            info!(version = SCHEMA_VERSION, "created oracle_requests schema");
        }
        Some(SCHEMA_VERSION) => {}
        Some(other) => return Err(StoreError::UnsupportedVersion(other)),
    }
    tx.commit()?;
    Ok(())
}

/// Reads the recorded schema version, if any.
pub fn schema_version(connection: &Connection) -> Result<Option<i64>> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_meta')",
        params![],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(None);
    }
    Ok(connection
        .query_row("SELECT version FROM schema_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?)
}
