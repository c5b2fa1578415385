//! Configuration subsystem.
//!
//! The proxy reads a TOML file plus `GITHUB_URL` / `GITHUB_ACCESS_TOKEN`
//! environment overrides. The resulting value is constructed once at startup
//! and handed to the server by value; there is no global or reloadable
//! state.

pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{ListenerConfig, ProxyConfig, UpstreamConfig};
