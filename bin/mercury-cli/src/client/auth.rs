//! HMAC request signing used by Mercury servers.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::hex;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::{ClientError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the client id.
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Header carrying the signing time in unix milliseconds.
pub const TIMESTAMP_HEADER: &str = "X-Authorization-Timestamp";
/// Header carrying the hex HMAC signature.
pub const SIGNATURE_HEADER: &str = "X-Authorization-Signature-SHA256";

/// Client id and secret issued by the Mercury server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Public client id.
    pub client_id: String,
    /// Shared HMAC secret.
    pub client_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("client_id", &self.client_id).finish_non_exhaustive()
    }
}

impl Credentials {
    /// Creates credentials from an id and key.
    pub fn new(client_id: impl Into<String>, client_key: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_key: client_key.into() }
    }

    /// Signs `"<method> <path> <hex(sha256(body))> <client_id> <timestamp>"` with the client key.
    ///
    /// `path` includes the query string.
    pub fn signature(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp_ms: u64,
    ) -> Result<String> {
        let body_hash = hex::encode(Sha256::digest(body));
        let message =
            format!("{method} {path} {body_hash} {} {timestamp_ms}", self.client_id);
        let mut mac = HmacSha256::new_from_slice(self.client_key.as_bytes())
            .map_err(|_| ClientError::InvalidKey)?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// The three authentication headers for a request.
    pub fn headers(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp_ms: u64,
    ) -> Result<[(&'static str, String); 3]> {
        Ok([
            (AUTHORIZATION_HEADER, self.client_id.clone()),
            (TIMESTAMP_HEADER, timestamp_ms.to_string()),
            (SIGNATURE_HEADER, self.signature(method, path, body, timestamp_ms)?),
        ])
    }
}

/// Current unix time in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// Path plus query of `url`, as signed.
pub(crate) fn signed_path(url: &url::Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic_and_keyed() {
        let creds = Credentials::new("client", "secret");
        let a = creds.signature("GET", "/client?feedIdHex=0x01", b"", 1_000).unwrap();
        let b = creds.signature("GET", "/client?feedIdHex=0x01", b"", 1_000).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let other_key = Credentials::new("client", "other");
        assert_ne!(a, other_key.signature("GET", "/client?feedIdHex=0x01", b"", 1_000).unwrap());
        assert_ne!(a, creds.signature("GET", "/client?feedIdHex=0x01", b"", 1_001).unwrap());
        assert_ne!(a, creds.signature("GET", "/client?feedIdHex=0x02", b"", 1_000).unwrap());
    }

    #[test]
    fn test_signature_matches_manual_hmac() {
        let creds = Credentials::new("id", "key");
        // sha256("") is e3b0c442...b855
        let message = "GET /admin/user \
                       e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855 id 42";
        let mut mac = HmacSha256::new_from_slice(b"key").unwrap();
        mac.update(message.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());
        assert_eq!(creds.signature("GET", "/admin/user", b"", 42).unwrap(), expected);
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = Credentials::new("id", "super-secret");
        assert!(!format!("{creds:?}").contains("super-secret"));
    }

    #[test]
    fn test_signed_path_keeps_query() {
        let url = url::Url::parse("http://localhost/client?a=1&b=2").unwrap();
        assert_eq!(signed_path(&url), "/client?a=1&b=2");
        let url = url::Url::parse("http://localhost/admin/user").unwrap();
        assert_eq!(signed_path(&url), "/admin/user");
    }
}
