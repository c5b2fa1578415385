//! Memoized GitHub API client.
//!
//! # Responsibilities
//! - Build the API client lazily on first use and reuse it for the process
//!   lifetime (guarded by `OnceCell`, so concurrent first calls construct it
//!   once)
//! - Wrap the REST operations the proxy consumes: get-release-by-tag,
//!   list-release-assets, download-asset-by-id
//!
//! # Design Decisions
//! - Rooted at `{github_url}/api/v3`, the enterprise API layout (the
//!   original applies it to the public host as well)
//! - Redirects are not followed, so asset downloads served from external
//!   blob storage surface as a `Location` header instead of being chased

use axum::http::header;
use reqwest::{redirect, Client, StatusCode};
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::config::UpstreamConfig;
use crate::error::HubbardError;

/// A release resolved from the upstream by tag.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
}

/// One of potentially many assets attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
}

/// Result of an asset download call: large binaries come back as a redirect
/// to external storage, small ones as the bytes themselves.
pub enum AssetDownload {
    Redirect(String),
    Stream(reqwest::Response),
}

/// Client for the upstream GitHub REST API.
///
/// Construction is cheap; the underlying HTTP client and credential are
/// resolved on the first API call, which is also the point where a missing
/// access token surfaces.
pub struct UpstreamClient {
    config: UpstreamConfig,
    inner: OnceCell<ApiClient>,
}

struct ApiClient {
    http: Client,
    api_root: String,
    token: String,
}

impl ApiClient {
    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
    }
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            config,
            inner: OnceCell::new(),
        }
    }

    async fn api(&self) -> Result<&ApiClient, HubbardError> {
        self.inner
            .get_or_try_init(|| async {
                let token = self.config.access_token()?.to_string();
                let http = Client::builder()
                    .redirect(redirect::Policy::none())
                    .user_agent(concat!("hubbard/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|source| HubbardError::UpstreamLookup {
                        stage: "couldn't build GitHub client",
                        source,
                    })?;
                Ok(ApiClient {
                    http,
                    api_root: self.config.api_root(),
                    token,
                })
            })
            .await
    }

    /// Retrieve a release by tag.
    pub async fn get_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, HubbardError> {
        let api = self.api().await?;
        let url = format!("{}/repos/{owner}/{repo}/releases/tags/{tag}", api.api_root);
        let response = api.get(url).send().await.map_err(|source| {
            HubbardError::UpstreamLookup {
                stage: "couldn't retrieve release for tag provided",
                source,
            }
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(HubbardError::ReleaseNotFound {
                tag: tag.to_string(),
            });
        }
        let response = response.error_for_status().map_err(|source| {
            HubbardError::UpstreamLookup {
                stage: "couldn't retrieve release for tag provided",
                source,
            }
        })?;
        response
            .json()
            .await
            .map_err(|source| HubbardError::UpstreamLookup {
                stage: "couldn't decode release for tag provided",
                source,
            })
    }

    /// List assets for a release. Only the first page of 50 is fetched;
    /// releases with more assets than that may not resolve.
    pub async fn list_assets(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
    ) -> Result<Vec<ReleaseAsset>, HubbardError> {
        let api = self.api().await?;
        let url = format!(
            "{}/repos/{owner}/{repo}/releases/{release_id}/assets",
            api.api_root
        );
        let response = api
            .get(url)
            .query(&[("page", "1"), ("per_page", "50")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| HubbardError::UpstreamLookup {
                stage: "couldn't get list of assets for tag",
                source,
            })?;
        response
            .json()
            .await
            .map_err(|source| HubbardError::UpstreamLookup {
                stage: "couldn't decode list of assets for tag",
                source,
            })
    }

    /// Download an asset by id, yielding either the redirect URL the
    /// upstream answered with or the response to stream bytes from.
    pub async fn download_asset(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
    ) -> Result<AssetDownload, HubbardError> {
        let api = self.api().await?;
        let url = format!(
            "{}/repos/{owner}/{repo}/releases/assets/{asset_id}",
            api.api_root
        );
        let response = api
            .get(url)
            .header(header::ACCEPT, "application/octet-stream")
            .send()
            .await
            .map_err(|source| HubbardError::UpstreamLookup {
                stage: "couldn't download release asset",
                source,
            })?;

        if response.status().is_redirection() {
            if let Some(location) = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                return Ok(AssetDownload::Redirect(location.to_string()));
            }
        }
        let response = response.error_for_status().map_err(|source| {
            HubbardError::UpstreamLookup {
                stage: "couldn't download release asset",
                source,
            }
        })?;
        Ok(AssetDownload::Stream(response))
    }
}
