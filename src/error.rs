//! Error taxonomy for request handling.
//!
//! Every variant is handled at the top-level request handler: logged, turned
//! into a response, and the request ends. A failing request never takes the
//! process down, and nothing is retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur while handling a proxied request.
#[derive(Debug, Error)]
pub enum HubbardError {
    /// No access token is configured.
    #[error("couldn't find an access token")]
    MissingCredential,

    /// The configured access token contains bytes not allowed in a header.
    #[error("access token is not a valid header value")]
    InvalidCredential,

    /// A GitHub API call failed. `stage` names the operation that failed.
    #[error("{stage}: {source}")]
    UpstreamLookup {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream reported no release for the requested tag.
    #[error("couldn't retrieve release for tag {tag}")]
    ReleaseNotFound { tag: String },

    /// The configured upstream base URL could not be parsed.
    #[error("couldn't parse github url when proxying request: {0}")]
    BadUpstreamUrl(#[from] url::ParseError),

    /// The forwarding transport failed to reach the upstream.
    #[error("couldn't proxy request to upstream: {0}")]
    Proxy(#[source] reqwest::Error),

    /// A response could not be assembled (invalid header value, etc.).
    #[error("couldn't assemble response: {0}")]
    Response(#[from] axum::http::Error),
}

impl HubbardError {
    /// Status code reported to the caller. Upstream and transport failures
    /// map to 502; configuration problems are ours, so 500.
    pub fn status(&self) -> StatusCode {
        match self {
            HubbardError::MissingCredential
            | HubbardError::InvalidCredential
            | HubbardError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HubbardError::UpstreamLookup { .. }
            | HubbardError::ReleaseNotFound { .. }
            | HubbardError::BadUpstreamUrl(_)
            | HubbardError::Proxy(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for HubbardError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
