//! Manage the oracle request audit log

mod cmd;

pub use cmd::*;
