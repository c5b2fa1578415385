//! Request classification.
//!
//! # Responsibilities
//! - Decide, per request path, which handling strategy applies
//! - Extract owner/repo/tag/asset coordinates from release download paths
//!
//! # Design Decisions
//! - Explicit category enum plus a single ordered-match function; the
//!   precedence contract is release-asset > raw > git > generic
//! - Plain segment parsing, no regex

/// Coordinates of a release asset extracted from a download path.
///
/// All fields are opaque strings captured from the path; nothing beyond the
/// shape of the path is validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAssetRequest {
    pub owner: String,
    pub repo: String,
    pub tag: String,
    pub asset_name: String,
}

/// How a request will be handled. Classification yields exactly one category
/// per path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestCategory {
    /// `/{owner}/{repo}/releases/download/{tag}/{asset}` — resolved through
    /// the GitHub API instead of being proxied.
    ReleaseAsset(ReleaseAssetRequest),

    /// Path starts with `/raw` — raw file bytes, authenticated with the
    /// token header and the raw media type.
    RawContent,

    /// Path ends with `.git` — git smart HTTP, authenticated with basic
    /// auth.
    GitOverHttp,

    /// Everything else — proxied with headers untouched.
    Generic,
}

/// Classify a request path. Checks run in priority order; the first match
/// governs even if a later shape would also apply.
pub fn classify(path: &str) -> RequestCategory {
    if let Some(asset) = match_release_asset(path) {
        return RequestCategory::ReleaseAsset(asset);
    }
    if path.starts_with("/raw") {
        return RequestCategory::RawContent;
    }
    if path.ends_with(".git") {
        return RequestCategory::GitOverHttp;
    }
    RequestCategory::Generic
}

/// Match `/{owner}/{repo}/releases/download/{tag}/{asset_name}` where owner,
/// repo and tag are single non-empty segments and the asset name is the
/// non-empty remainder of the path (it may itself contain slashes).
fn match_release_asset(path: &str) -> Option<ReleaseAssetRequest> {
    let rest = path.strip_prefix('/')?;
    let (owner, rest) = rest.split_once('/')?;
    let (repo, rest) = rest.split_once('/')?;
    let rest = rest.strip_prefix("releases/download/")?;
    let (tag, asset_name) = rest.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || tag.is_empty() || asset_name.is_empty() {
        return None;
    }
    Some(ReleaseAssetRequest {
        owner: owner.to_string(),
        repo: repo.to_string(),
        tag: tag.to_string(),
        asset_name: asset_name.to_string(),
    })
}
