//! Audit log of oracle requests, stored in SQLite.
//!
//! Every request observed on chain is recorded once in the `oracle_requests` table. Rows are
//! never rewritten apart from the fulfilment timestamp.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::*;

mod migration;
pub use migration::*;

mod request;
pub use request::*;

mod store;
pub use store::*;
