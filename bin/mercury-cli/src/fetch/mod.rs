//! Fetch a report from the HTTP API

mod cmd;

pub use cmd::*;
