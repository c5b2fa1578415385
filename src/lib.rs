//! Authenticating reverse proxy for a private GitHub instance.
//!
//! Clients — git tooling, raw-file fetchers, release downloaders — talk to
//! the proxy without credentials of their own. Each request is classified
//! by URL shape and a single shared access token is injected into the
//! outbound leg: raw-content paths get a token header, git smart HTTP gets
//! basic auth, release download paths are resolved through the GitHub API,
//! and everything else is proxied untouched.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::HubbardError;
pub use http::HttpServer;
