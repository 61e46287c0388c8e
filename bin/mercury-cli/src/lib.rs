//! Client, stream reader and load harness for Mercury report servers.
//!
//! The binary wraps these in subcommands; tests drive them directly against mock servers.

pub mod admin;
pub mod client;
pub mod common;
pub mod decode;
pub mod fetch;
pub mod load;
pub mod requests;
pub mod stream;

mod cmd;
pub use cmd::*;
