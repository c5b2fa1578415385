//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as LegacyClient;
use hyper_util::rt::TokioExecutor;
use serde_json::json;
use tokio::net::TcpListener;

use hubbard::config::ProxyConfig;
use hubbard::HttpServer;

/// Body served for asset id 7 (`widgets.tar.gz`).
pub const ZIP_BYTES: &[u8] = b"PK\x03\x04fake-zip-bytes";

/// Redirect target served for asset id 8 (`widgets.sig`).
pub const REDIRECT_TARGET: &str = "https://objects.example.com/assets/8";

/// One request observed by the mock upstream.
#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub path_and_query: String,
    pub headers: HeaderMap,
}

/// Requests seen by the mock upstream, shared with the test body.
#[derive(Clone, Default)]
pub struct Captured {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Captured {
    pub fn all(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests that hit the generic fallback rather than the API routes.
    pub fn proxied(&self) -> Vec<CapturedRequest> {
        self.all()
            .into_iter()
            .filter(|r| !r.path_and_query.starts_with("/api/v3"))
            .collect()
    }

    /// Requests that hit the GitHub API routes.
    pub fn api_calls(&self) -> Vec<CapturedRequest> {
        self.all()
            .into_iter()
            .filter(|r| r.path_and_query.starts_with("/api/v3"))
            .collect()
    }

    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        self.requests.lock().unwrap().push(CapturedRequest {
            path_and_query: uri
                .path_and_query()
                .map(|pq| pq.to_string())
                .unwrap_or_else(|| uri.path().to_string()),
            headers: headers.clone(),
        });
    }
}

/// Start a mock GitHub instance: API routes for one release (`v1.2.0` of
/// `acme/widgets`, assets `widgets.tar.gz` and `widgets.sig`) plus a
/// fallback that stands in for the proxied website.
pub async fn start_mock_upstream() -> (String, Captured) {
    let captured = Captured::default();

    let app = Router::new()
        .route(
            "/api/v3/repos/{owner}/{repo}/releases/tags/{tag}",
            get(get_release),
        )
        .route(
            "/api/v3/repos/{owner}/{repo}/releases/{id}/assets",
            get(list_assets),
        )
        .route(
            "/api/v3/repos/{owner}/{repo}/releases/assets/{id}",
            get(download_asset),
        )
        .fallback(proxied_site)
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

async fn get_release(
    State(captured): State<Captured>,
    uri: Uri,
    headers: HeaderMap,
    Path((_owner, _repo, tag)): Path<(String, String, String)>,
) -> Response {
    captured.record(&uri, &headers);
    if tag == "v1.2.0" {
        Json(json!({ "id": 101, "tag_name": tag })).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn list_assets(
    State(captured): State<Captured>,
    uri: Uri,
    headers: HeaderMap,
    Path((_owner, _repo, _id)): Path<(String, String, u64)>,
) -> Response {
    captured.record(&uri, &headers);
    Json(json!([
        { "id": 7, "name": "widgets.tar.gz" },
        { "id": 8, "name": "widgets.sig" },
    ]))
    .into_response()
}

async fn download_asset(
    State(captured): State<Captured>,
    uri: Uri,
    headers: HeaderMap,
    Path((_owner, _repo, id)): Path<(String, String, u64)>,
) -> Response {
    captured.record(&uri, &headers);
    match id {
        7 => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            ZIP_BYTES,
        )
            .into_response(),
        8 => (
            StatusCode::FOUND,
            [(header::LOCATION, REDIRECT_TARGET)],
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn proxied_site(State(captured): State<Captured>, uri: Uri, headers: HeaderMap) -> &'static str {
    captured.record(&uri, &headers);
    "upstream ok"
}

/// Start the proxy against the given upstream, listening on an ephemeral
/// port.
pub async fn start_proxy(github_url: &str, token: Option<&str>) -> SocketAddr {
    let mut config = ProxyConfig::default();
    config.upstream.github_url = github_url.to_string();
    config.upstream.github_access_token = token.map(|t| t.to_string());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// Client that neither follows redirects nor picks up a system proxy.
///
/// Built on hyper directly rather than reqwest: reqwest unconditionally
/// sends a default `Accept: */*`, which the tests asserting on forwarded
/// headers must not see.
pub fn client() -> TestClient {
    TestClient {
        inner: LegacyClient::builder(TokioExecutor::new()).build_http(),
    }
}

pub struct TestClient {
    inner: LegacyClient<HttpConnector, Full<Bytes>>,
}

impl TestClient {
    pub fn get(&self, url: impl AsRef<str>) -> TestRequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: impl AsRef<str>) -> TestRequestBuilder {
        self.request(Method::POST, url)
    }

    fn request(&self, method: Method, url: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder {
            client: self.inner.clone(),
            builder: axum::http::Request::builder().method(method).uri(url.as_ref()),
            body: Bytes::new(),
        }
    }
}

pub struct TestRequestBuilder {
    client: LegacyClient<HttpConnector, Full<Bytes>>,
    builder: axum::http::request::Builder,
    body: Bytes,
}

impl TestRequestBuilder {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub async fn send(self) -> Result<TestResponse, Box<dyn std::error::Error + Send + Sync>> {
        let request = self.builder.body(Full::new(self.body))?;
        let (parts, body) = self.client.request(request).await?.into_parts();
        Ok(TestResponse {
            status: parts.status,
            headers: parts.headers,
            body: body.collect().await?.to_bytes(),
        })
    }
}

pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub async fn bytes(self) -> Result<Bytes, std::convert::Infallible> {
        Ok(self.body)
    }

    pub async fn text(self) -> Result<String, std::convert::Infallible> {
        Ok(String::from_utf8_lossy(&self.body).into_owned())
    }
}
