//! Load harness: simulated validators hammering a Mercury server concurrently.

mod cmd;
mod report;
mod runner;

pub use cmd::*;
pub use report::*;
pub use runner::*;
