//! Generic request forwarding to the upstream host.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the upstream base URL, keeping
//!   method, path, query and (already authenticated) headers
//! - Stream request and response bodies without buffering
//!
//! # Design Decisions
//! - Redirects are not followed; 3xx responses pass through to the caller
//! - Hop-by-hop and framing headers are stripped and re-derived on each leg

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::Response;
use reqwest::redirect;
use url::Url;

use crate::error::HubbardError;

/// Forwards non-release requests to the configured upstream.
pub struct Forwarder {
    http: reqwest::Client,
    base: Url,
}

impl Forwarder {
    /// Build a forwarder for the given upstream base URL. A malformed URL
    /// is rejected here, before the server starts taking requests.
    pub fn new(github_url: &str) -> Result<Self, HubbardError> {
        let base = Url::parse(github_url)?;
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(HubbardError::Proxy)?;
        Ok(Self { http, base })
    }

    /// Forward one request and stream the upstream response back.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, HubbardError> {
        let (parts, body) = request.into_parts();

        let mut url = self.base.clone();
        url.set_path(parts.uri.path());
        url.set_query(parts.uri.query());

        let mut headers = parts.headers;
        strip_connection_headers(&mut headers);
        // The client re-frames the body and derives Host from the URL.
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);

        let response = self
            .http
            .request(parts.method, url)
            .headers(headers)
            .body(reqwest::Body::wrap_stream(body.into_data_stream()))
            .send()
            .await
            .map_err(HubbardError::Proxy)?;

        let mut builder = Response::builder().status(response.status());
        if let Some(out) = builder.headers_mut() {
            for (name, value) in response.headers() {
                if name == header::CONNECTION || name == header::TRANSFER_ENCODING {
                    continue;
                }
                out.insert(name.clone(), value.clone());
            }
        }
        Ok(builder.body(Body::from_stream(response.bytes_stream()))?)
    }
}

fn strip_connection_headers(headers: &mut HeaderMap) {
    for name in [
        header::CONNECTION,
        header::TRANSFER_ENCODING,
        header::PROXY_AUTHORIZATION,
        header::TE,
        header::UPGRADE,
    ] {
        headers.remove(name);
    }
}
