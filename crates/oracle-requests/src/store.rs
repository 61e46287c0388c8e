//! rusqlite-backed access to the `oracle_requests` table.

use std::path::Path;

use alloy_primitives::{Address, B256, U256};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::{migrate, schema_version, OracleRequest, Result, StoreError};

const SELECT_COLUMNS: &str = "id, request_id, contract_address, subscription_id, \
     subscription_owner, job_id, payment, callback_address, callback_gas_limit, tx_hash, \
     created_at, fulfilled_at";

/// Store for the oracle request audit log.
#[derive(Debug)]
pub struct OracleRequestStore {
    connection: Connection,
}

impl OracleRequestStore {
    /// Opens (creating if needed) the database at `path` and migrates it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(path)?;
        connection.execute_batch("PRAGMA journal_mode = wal; PRAGMA foreign_keys = ON;")?;
        Self::with_connection(connection)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut connection: Connection) -> Result<Self> {
        migrate(&mut connection)?;
        Ok(Self { connection })
    }

    /// Records a new request.
    pub fn insert(&self, request: &OracleRequest) -> Result<()> {
        insert_row(&self.connection, request)
    }

    /// Records a batch of requests in one transaction. Either every request is recorded or none
    /// is.
    pub fn insert_all(&mut self, requests: &[OracleRequest]) -> Result<()> {
        let tx = self.connection.transaction()?;
        for request in requests {
            insert_row(&tx, request)?;
        }
        tx.commit()?;
        debug!(count = requests.len(), "recorded oracle request batch");
        Ok(())
    }

    /// Looks up a request by id.
    pub fn get(&self, request_id: B256) -> Result<Option<OracleRequest>> {
        let raw = self
            .connection
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM oracle_requests WHERE request_id = ?1"),
                params![request_id.as_slice()],
                RawRow::read,
            )
            .optional()?;
        raw.map(RawRow::decode).transpose()
    }

    /// All requests billed to `subscription_id`, in insertion order.
    pub fn list_by_subscription(&self, subscription_id: u64) -> Result<Vec<OracleRequest>> {
        let mut stmt = self.connection.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM oracle_requests WHERE subscription_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![subscription_id], RawRow::read)?;
        rows.map(|row| row.map_err(StoreError::from).and_then(RawRow::decode)).collect()
    }

    /// Stamps the fulfilment time of a request.
    pub fn mark_fulfilled(&self, request_id: B256, fulfilled_at: u64) -> Result<()> {
        let updated = self.connection.execute(
            "UPDATE oracle_requests SET fulfilled_at = ?1 WHERE request_id = ?2",
            params![fulfilled_at, request_id.as_slice()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(request_id));
        }
        debug!(%request_id, fulfilled_at, "marked oracle request fulfilled");
        Ok(())
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<Option<i64>> {
        schema_version(&self.connection)
    }

    /// Number of recorded requests.
    pub fn count(&self) -> Result<u64> {
        Ok(self.connection.query_row("SELECT COUNT(*) FROM oracle_requests", params![], |row| {
            row.get(0)
        })?)
    }
}

fn insert_row(connection: &Connection, request: &OracleRequest) -> Result<()> {
    let result = connection.execute(
        "INSERT INTO oracle_requests (request_id, contract_address, subscription_id, \
         subscription_owner, job_id, payment, callback_address, callback_gas_limit, tx_hash, \
         created_at, fulfilled_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            request.request_id.as_slice(),
            request.contract_address.as_slice(),
            request.subscription_id,
            request.subscription_owner.as_slice(),
            request.job_id.as_slice(),
            request.payment.to_string(),
            request.callback_address.as_slice(),
            request.callback_gas_limit,
            request.tx_hash.as_slice(),
            request.created_at,
            request.fulfilled_at,
        ],
    );
    match result {
        Ok(_) => {
            debug!(request_id = %request.request_id, "recorded oracle request");
            Ok(())
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(StoreError::DuplicateRequest(request.request_id))
        }
        Err(err) => Err(err.into()),
    }
}

/// A row as stored, before fixed-length columns are checked.
struct RawRow {
    id: i64,
    request_id: Vec<u8>,
    contract_address: Vec<u8>,
    subscription_id: u64,
    subscription_owner: Vec<u8>,
    job_id: Vec<u8>,
    payment: String,
    callback_address: Vec<u8>,
    callback_gas_limit: u32,
    tx_hash: Vec<u8>,
    created_at: u64,
    fulfilled_at: Option<u64>,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            request_id: row.get(1)?,
            contract_address: row.get(2)?,
            subscription_id: row.get(3)?,
            subscription_owner: row.get(4)?,
            job_id: row.get(5)?,
            payment: row.get(6)?,
            callback_address: row.get(7)?,
            callback_gas_limit: row.get(8)?,
            tx_hash: row.get(9)?,
            created_at: row.get(10)?,
            fulfilled_at: row.get(11)?,
        })
    }

    fn decode(self) -> Result<OracleRequest> {
        let id = self.id;
        let corrupt = |reason: String| StoreError::CorruptRow { id, reason };
        let word = |name: &str, bytes: &[u8]| {
            B256::try_from(bytes).map_err(|_| corrupt(format!("{name} has {} bytes", bytes.len())))
        };
        let address = |name: &str, bytes: &[u8]| {
            Address::try_from(bytes)
                .map_err(|_| corrupt(format!("{name} has {} bytes", bytes.len())))
        };

        Ok(OracleRequest {
            request_id: word("request_id", &self.request_id)?,
            contract_address: address("contract_address", &self.contract_address)?,
            subscription_id: self.subscription_id,
            subscription_owner: address("subscription_owner", &self.subscription_owner)?,
            job_id: word("job_id", &self.job_id)?,
            payment: self
                .payment
                .parse::<U256>()
                .map_err(|err| corrupt(format!("payment: {err}")))?,
            callback_address: address("callback_address", &self.callback_address)?,
            callback_gas_limit: self.callback_gas_limit,
            tx_hash: word("tx_hash", &self.tx_hash)?,
            created_at: self.created_at,
            fulfilled_at: self.fulfilled_at,
        })
    }
}
