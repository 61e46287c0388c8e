//! Reader for the server's `/ws` report stream.

use futures_util::StreamExt;
use mercury_report::FullReport;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, trace};
use url::Url;

use super::{auth::signed_path, now_ms, Credentials, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A message pushed by the stream endpoint.
#[derive(Debug, Deserialize)]
struct StreamMessage {
    /// Hex-encoded full report.
    report: String,
}

/// Open subscription to the report stream.
#[derive(Debug)]
pub struct ReportStream {
    ws: WsStream,
}

impl ReportStream {
    /// Connects to `url`, signing the upgrade request when credentials are given.
    pub async fn connect(url: &Url, credentials: Option<&Credentials>) -> Result<Self> {
        let mut request = url.as_str().into_client_request()?;
        if let Some(credentials) = credentials {
            for (name, value) in credentials.headers("GET", &signed_path(url), &[], now_ms())? {
                request.headers_mut().insert(name, HeaderValue::from_str(&value)?);
            }
        }

        let (ws, response) = connect_async(request).await?;
        debug!(%url, status = %response.status(), "connected to report stream");
        Ok(Self { ws })
    }

    /// Waits for the next report. Returns `None` once the server closes the stream.
    pub async fn next_report(&mut self) -> Result<Option<FullReport>> {
        while let Some(message) = self.ws.next().await {
            let payload: StreamMessage = match message? {
                Message::Text(text) => serde_json::from_str(text.as_str())?,
                Message::Binary(bytes) => serde_json::from_slice(&bytes)?,
                Message::Close(frame) => {
                    debug!(?frame, "report stream closed");
                    return Ok(None);
                }
                other => {
                    trace!(?other, "skipping control frame");
                    continue;
                }
            };
            return Ok(Some(FullReport::from_hex(&payload.report)?));
        }
        Ok(None)
    }

    /// Closes the connection.
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
