//! Outbound credential injection.
//!
//! # Responsibilities
//! - Attach the shared access token to raw-content requests
//! - Attach basic auth for git smart HTTP
//! - Leave all other requests untouched
//!
//! # Design Decisions
//! - Headers are mutated in place before forwarding; the response is never
//!   consulted
//! - Injected credential headers are marked sensitive so they stay out of
//!   debug output

use std::io::Write;

use axum::http::{header, HeaderMap, HeaderValue};
use base64::prelude::BASE64_STANDARD;
use base64::write::EncoderWriter;

use crate::config::UpstreamConfig;
use crate::error::HubbardError;
use crate::routing::RequestCategory;

/// Media type that makes GitHub return raw file bytes rather than the
/// JSON-wrapped representation.
pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// Fixed basic-auth password used when the username is a personal access
/// token. GitHub only validates the username in that case, but the password
/// must still be non-empty.
pub const GIT_BASIC_AUTH_PASSWORD: &str = "x-oauth-basic";

/// Mutate outbound headers according to the request category.
///
/// The access token is resolved up front, so any proxied request fails with
/// a configuration error when no token is set, before an outbound call is
/// made. Generic requests with a token configured pass through untouched.
pub fn authenticate(
    headers: &mut HeaderMap,
    category: &RequestCategory,
    upstream: &UpstreamConfig,
) -> Result<(), HubbardError> {
    let token = upstream.access_token()?;
    match category {
        RequestCategory::RawContent => {
            let mut value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| HubbardError::InvalidCredential)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
            headers.insert(header::ACCEPT, HeaderValue::from_static(RAW_MEDIA_TYPE));
        }
        RequestCategory::GitOverHttp => {
            tracing::debug!("adding basic auth for git smart HTTP");
            headers.insert(
                header::AUTHORIZATION,
                basic_auth(token, GIT_BASIC_AUTH_PASSWORD)?,
            );
        }
        RequestCategory::ReleaseAsset(_) | RequestCategory::Generic => {}
    }
    Ok(())
}

/// Build a `Basic` authorization header without materializing the
/// credentials in an intermediate string.
fn basic_auth(username: &str, password: &str) -> Result<HeaderValue, HubbardError> {
    let mut buf = b"Basic ".to_vec();
    {
        let mut encoder = EncoderWriter::new(&mut buf, &BASE64_STANDARD);
        let _ = write!(encoder, "{username}:{password}");
    }
    let mut header =
        HeaderValue::from_bytes(&buf).map_err(|_| HubbardError::InvalidCredential)?;
    header.set_sensitive(true);
    Ok(header)
}
