//! Check the admin role of the configured credentials

mod cmd;

pub use cmd::*;
