//! `mercury-cli`: talk to, stream from and load-test Mercury report servers.

use clap::Parser;
use mercury_cli::{Cli, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    Cli::parse().run().await.inspect_err(|e| eprintln!("{e}"))
}
