//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Configuration is loaded once at startup and owned by the server state;
//! it is immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::HubbardError;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream GitHub instance and credential.
    pub upstream: UpstreamConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:41968").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:41968".to_string(),
        }
    }
}

/// Upstream GitHub instance configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the GitHub instance being proxied to.
    pub github_url: String,

    /// Personal access token injected into outbound requests.
    /// Must never appear in logs.
    pub github_access_token: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            github_url: "https://github.com".to_string(),
            github_access_token: None,
        }
    }
}

impl UpstreamConfig {
    /// Base URL of the upstream host.
    pub fn github_url(&self) -> &str {
        &self.github_url
    }

    /// Root of the GitHub REST API for this instance.
    pub fn api_root(&self) -> String {
        format!("{}/api/v3", self.github_url.trim_end_matches('/'))
    }

    /// The shared access token. Absence is a terminal error for any request
    /// that reaches authentication or asset resolution; it is not retried.
    pub fn access_token(&self) -> Result<&str, HubbardError> {
        self.github_access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(HubbardError::MissingCredential)
    }
}
