//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Apply `GITHUB_URL` / `GITHUB_ACCESS_TOKEN` overrides on top of the file
/// configuration. Takes a lookup closure rather than reading process
/// environment directly so tests can inject values.
pub fn apply_env_overrides(
    config: &mut ProxyConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(url) = lookup("GITHUB_URL").filter(|v| !v.is_empty()) {
        config.upstream.github_url = url;
    }
    if let Some(token) = lookup("GITHUB_ACCESS_TOKEN").filter(|v| !v.is_empty()) {
        config.upstream.github_access_token = Some(token);
    }
}
