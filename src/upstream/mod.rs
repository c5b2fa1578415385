//! Upstream GitHub API subsystem.
//!
//! # Data Flow
//! ```text
//! release download path
//!     → client.rs (memoized API client, one call per stage)
//!         → GET /repos/{owner}/{repo}/releases/tags/{tag}
//!         → GET /repos/{owner}/{repo}/releases/{id}/assets  (page 1, ≤50)
//!         → GET /repos/{owner}/{repo}/releases/assets/{id}
//!     → releases.rs (match asset by name, build 307 or stream bytes)
//! ```

pub mod client;
pub mod releases;

pub use client::{AssetDownload, Release, ReleaseAsset, UpstreamClient};
