//! Release asset resolution.
//!
//! Turns a matched download path into a response by walking the GitHub API:
//! release by tag, asset listing, then the asset content itself. This path
//! is terminal; a request that matched the release-asset shape is never
//! handed to the generic forwarder, whatever the outcome here.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::HubbardError;
use crate::routing::ReleaseAssetRequest;
use crate::upstream::client::{AssetDownload, UpstreamClient};

/// Resolve a release asset request to a response.
///
/// The response is a 307 pointing at external storage when the upstream
/// answers with a redirect, the streamed asset bytes otherwise. An asset
/// name that appears on no listed asset yields an empty 200 — reference
/// behavior kept as-is, though 404 may be the better answer.
pub async fn resolve(
    client: &UpstreamClient,
    request: &ReleaseAssetRequest,
) -> Result<Response, HubbardError> {
    tracing::info!(
        owner = %request.owner,
        repo = %request.repo,
        tag = %request.tag,
        asset = %request.asset_name,
        "retrieving release asset"
    );

    let release = client
        .get_release(&request.owner, &request.repo, &request.tag)
        .await?;

    tracing::debug!(release_id = release.id, tag = %release.tag_name, "getting assets for release");
    let assets = client
        .list_assets(&request.owner, &request.repo, release.id)
        .await?;

    let Some(asset) = assets.iter().find(|a| a.name == request.asset_name) else {
        tracing::warn!(
            asset = %request.asset_name,
            listed = assets.len(),
            "release has no asset with that name"
        );
        return Ok(StatusCode::OK.into_response());
    };

    match client
        .download_asset(&request.owner, &request.repo, asset.id)
        .await?
    {
        AssetDownload::Redirect(url) => {
            tracing::info!(asset_id = asset.id, "asset served via redirect");
            let response = Response::builder()
                .status(StatusCode::TEMPORARY_REDIRECT)
                .header(header::LOCATION, url)
                .body(Body::empty())?;
            Ok(response)
        }
        AssetDownload::Stream(upstream) => {
            tracing::info!(asset_id = asset.id, "streaming asset bytes");
            let mut builder = Response::builder().status(StatusCode::OK);
            for name in [header::CONTENT_TYPE, header::CONTENT_LENGTH] {
                if let Some(value) = upstream.headers().get(&name) {
                    builder = builder.header(name, value.clone());
                }
            }
            // Streaming ties the upstream connection to the response body;
            // dropping the body on any exit path closes it.
            let response = builder.body(Body::from_stream(upstream.bytes_stream()))?;
            Ok(response)
        }
    }
}
