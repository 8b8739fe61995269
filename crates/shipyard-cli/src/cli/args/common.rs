//! Shared argument types used across multiple commands.

use std::path::PathBuf;

use clap::ValueEnum;
use shipyard_authz::{AuthzConfig, Consistency};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpandFormat {
    #[default]
    Json,
    Dot,
}

/// Connection settings for the authorization service.
#[derive(clap::Args, Clone)]
pub struct AuthzArgs {
    /// Base URL of the authorization service's HTTP API
    #[arg(
        long,
        default_value = "https://localhost:8443",
        env = "SHIPYARD_AUTHZ_ENDPOINT"
    )]
    pub endpoint: String,

    /// Bearer token
    #[arg(long, env = "SHIPYARD_AUTHZ_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// PEM certificate added as an extra trust root (self-signed dev servers)
    #[arg(long, env = "SHIPYARD_AUTHZ_CA_CERT")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, env = "SHIPYARD_AUTHZ_TIMEOUT")]
    pub timeout_secs: u64,

    /// Read at the newest snapshot instead of minimizing latency
    #[arg(long, env = "SHIPYARD_AUTHZ_FULLY_CONSISTENT")]
    pub fully_consistent: bool,
}

// Token stays out of logs.
impl std::fmt::Debug for AuthzArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthzArgs")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("ca_cert", &self.ca_cert)
            .field("timeout_secs", &self.timeout_secs)
            .field("fully_consistent", &self.fully_consistent)
            .finish()
    }
}

impl AuthzArgs {
    pub fn to_config(&self) -> AuthzConfig {
        let mut config = AuthzConfig::default()
            .with_endpoint(&self.endpoint)
            .with_timeout_secs(self.timeout_secs)
            .with_consistency(if self.fully_consistent {
                Consistency::FullyConsistent
            } else {
                Consistency::MinimizeLatency
            });

        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(path) = &self.ca_cert {
            config = config.with_ca_cert(path);
        }
        config
    }
}
