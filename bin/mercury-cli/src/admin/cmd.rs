use clap::Parser;
use serde_json::json;

use crate::common::{Result, ServerArgs};

/// Check whether the configured credentials hold the admin role
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Server configuration
    #[command(flatten)]
    pub server: ServerArgs,
}

impl Cmd {
    /// Execute the admin command
    pub async fn run(&self) -> Result<()> {
        let admin = self.server.client()?.is_admin().await?;
        println!("{}", json!({ "admin": admin }));
        Ok(())
    }
}
