use std::time::Duration;

use clap::Args;
use url::Url;

use super::{CliError, Result};
use crate::client::{Credentials, MercuryClient, MercuryConfig};

/// Credentials used to sign requests to a Mercury server.
#[derive(Debug, Clone, Default, Args)]
pub struct CredentialArgs {
    /// Client id used to sign requests
    #[arg(long = "client-id", env = "MERCURY_CLIENT_ID", requires = "client_key")]
    pub client_id: Option<String>,

    /// Client key used to sign requests
    #[arg(
        long = "client-key",
        env = "MERCURY_CLIENT_KEY",
        hide_env_values = true,
        requires = "client_id"
    )]
    pub client_key: Option<String>,
}

impl CredentialArgs {
    /// Credentials, when both halves were supplied.
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        match (&self.client_id, &self.client_key) {
            (Some(id), Some(key)) => Ok(Some(Credentials::new(id, key))),
            (None, None) => Ok(None),
            _ => Err(CliError::InvalidInput(
                "--client-id and --client-key must be given together".to_string(),
            )),
        }
    }
}

/// Mercury server connection arguments.
#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    /// Base URL of the Mercury server
    #[arg(long = "url", env = "MERCURY_URL", default_value = "http://localhost:8080")]
    pub url: Url,

    /// Request signing credentials
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Per-request timeout in milliseconds
    #[arg(long = "timeout-ms", default_value = "10000")]
    pub timeout_ms: u64,
}

impl ServerArgs {
    /// Client configuration for these arguments.
    pub fn config(&self) -> Result<MercuryConfig> {
        let mut config = MercuryConfig::new(self.url.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms));
        if let Some(credentials) = self.credentials.credentials()? {
            config = config.with_credentials(credentials);
        }
        Ok(config)
    }

    /// Builds the HTTP client.
    pub fn client(&self) -> Result<MercuryClient> {
        Ok(MercuryClient::new(self.config()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct ServerCli {
        #[command(flatten)]
        server: ServerArgs,
    }

    #[derive(Parser, Debug)]
    struct CredentialCli {
        #[command(flatten)]
        credentials: CredentialArgs,
    }

    #[test]
    fn test_server_args_sign_when_both_halves_given() {
        let cli = ServerCli::try_parse_from([
            "mercury-cli",
            "--url",
            "http://mercury.test:9000",
            "--client-id",
            "id",
            "--client-key",
            "key",
        ])
        .unwrap();
        let config = cli.server.config().unwrap();
        assert_eq!(config.url.as_str(), "http://mercury.test:9000/");
        assert_eq!(config.credentials, Some(Credentials::new("id", "key")));
    }

    #[test]
    fn test_credential_args_reject_server_flags() {
        assert!(CredentialCli::try_parse_from(["mercury-cli", "--url", "http://x"]).is_err());
        assert!(CredentialCli::try_parse_from(["mercury-cli", "--timeout-ms", "5"]).is_err());
        assert!(CredentialCli::try_parse_from(["mercury-cli", "--client-id", "id"]).is_err());
    }
}
