//! Tests for the oracle request store.

use alloy_primitives::{address, Address, B256, U256};
use oracle_requests::{migrate, OracleRequest, OracleRequestStore, StoreError};
use rusqlite::Connection;

const COORDINATOR: Address = address!("0x6090149792dAAeE9D1D568c9f9a6F6B46AA29eFD");
const OWNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const CONSUMER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

fn request(n: u8, subscription_id: u64) -> OracleRequest {
    OracleRequest {
        request_id: B256::with_last_byte(n),
        contract_address: COORDINATOR,
        subscription_id,
        subscription_owner: OWNER,
        job_id: B256::repeat_byte(0x42),
        payment: U256::from(10u64).pow(U256::from(18u64)) * U256::from(n),
        callback_address: CONSUMER,
        callback_gas_limit: 300_000,
        tx_hash: B256::repeat_byte(n),
        created_at: 1_700_000_000 + u64::from(n),
        fulfilled_at: None,
    }
}

#[test]
fn test_insert_and_get() {
    let store = OracleRequestStore::open_in_memory().unwrap();
    let req = request(1, 7);
    store.insert(&req).unwrap();

    assert_eq!(store.get(req.request_id).unwrap(), Some(req));
    assert_eq!(store.get(B256::ZERO).unwrap(), None);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_duplicate_request_rejected() {
    let store = OracleRequestStore::open_in_memory().unwrap();
    store.insert(&request(1, 7)).unwrap();
    let err = store.insert(&request(1, 8)).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRequest(id) if id == B256::with_last_byte(1)));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_insert_all_is_atomic() {
    let mut store = OracleRequestStore::open_in_memory().unwrap();
    let batch = [request(1, 7), request(2, 7), request(1, 7)];
    let err = store.insert_all(&batch).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRequest(id) if id == B256::with_last_byte(1)));
    assert_eq!(store.count().unwrap(), 0);

    store.insert_all(&batch[..2]).unwrap();
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_list_by_subscription_keeps_insertion_order() {
    let store = OracleRequestStore::open_in_memory().unwrap();
    for (n, sub) in [(3, 1), (1, 2), (2, 1), (4, 1)] {
        store.insert(&request(n, sub)).unwrap();
    }
    let ids: Vec<_> = store
        .list_by_subscription(1)
        .unwrap()
        .into_iter()
        .map(|r| r.request_id)
        .collect();
    assert_eq!(ids, [3, 2, 4].map(B256::with_last_byte));
    assert!(store.list_by_subscription(99).unwrap().is_empty());
}

#[test]
fn test_mark_fulfilled() {
    let store = OracleRequestStore::open_in_memory().unwrap();
    let req = request(5, 1);
    store.insert(&req).unwrap();
    store.mark_fulfilled(req.request_id, 1_800_000_000).unwrap();

    let stored = store.get(req.request_id).unwrap().unwrap();
    assert!(stored.is_fulfilled());
    assert_eq!(stored.fulfilled_at, Some(1_800_000_000));

    store.mark_fulfilled(req.request_id, 1_900_000_000).unwrap();
    assert_eq!(store.get(req.request_id).unwrap().unwrap().fulfilled_at, Some(1_900_000_000));

    assert!(matches!(
        store.mark_fulfilled(B256::ZERO, 1),
        Err(StoreError::NotFound(id)) if id == B256::ZERO
    ));
}

#[test]
fn test_reopen_on_disk_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("requests.db");
    {
        let store = OracleRequestStore::open(&path).unwrap();
        store.insert(&request(9, 3)).unwrap();
    }
    let store = OracleRequestStore::open(&path).unwrap();
    assert_eq!(store.list_by_subscription(3).unwrap(), vec![request(9, 3)]);
}

#[test]
fn test_corrupt_payment_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("requests.db");
    {
        let store = OracleRequestStore::open(&path).unwrap();
        store.insert(&request(1, 1)).unwrap();
    }
    let mut connection = Connection::open(&path).unwrap();
    migrate(&mut connection).unwrap();
    connection.execute("UPDATE oracle_requests SET payment = 'lots'", []).unwrap();
    drop(connection);

    let store = OracleRequestStore::open(&path).unwrap();
    assert!(matches!(store.get(B256::with_last_byte(1)), Err(StoreError::CorruptRow { .. })));
}
