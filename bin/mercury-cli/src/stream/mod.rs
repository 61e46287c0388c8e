//! Read reports from the WebSocket stream

mod cmd;

pub use cmd::*;
