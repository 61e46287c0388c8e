mod args;
mod error;
mod hex;
mod logging;
mod summary;

pub use args::*;
pub use error::*;
pub use hex::*;
pub use logging::*;
pub use summary::*;
