//! Decode a full report from hex input

mod cmd;

pub use cmd::*;
