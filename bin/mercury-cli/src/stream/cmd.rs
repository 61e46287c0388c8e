use clap::Parser;
use tracing::{info, warn};
use url::Url;

use crate::{
    client::ReportStream,
    common::{CredentialArgs, ReportSummary, Result},
};

/// Print reports pushed over the WebSocket stream, one JSON object per line
#[derive(Parser, Debug)]
pub struct Cmd {
    /// WebSocket endpoint
    #[arg(long = "ws-url", env = "MERCURY_WS_URL", default_value = "ws://localhost:8080/ws")]
    pub ws_url: Url,

    /// Stop after this many reports (0 = until the server closes the stream)
    #[arg(long = "count", default_value = "0")]
    pub count: usize,

    /// Request signing credentials
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

impl Cmd {
    /// Execute the stream command
    pub async fn run(&self) -> Result<()> {
        let credentials = self.credentials.credentials()?;
        let mut stream = ReportStream::connect(&self.ws_url, credentials.as_ref()).await?;

        let mut received = 0;
        while self.count == 0 || received < self.count {
            let Some(full) = stream.next_report().await? else {
                warn!(received, "stream closed by server");
                return Ok(());
            };
            received += 1;
            let summary = ReportSummary::new(&full, None, false)?;
            println!("{}", serde_json::to_string(&summary)?);
        }

        info!(received, "closing report stream");
        stream.close().await?;
        Ok(())
    }
}
