//! Clients for the Mercury report server's HTTP and WebSocket APIs.

mod auth;
mod error;
mod http;
mod stream;

pub use auth::*;
pub use error::*;
pub use http::*;
pub use stream::*;
