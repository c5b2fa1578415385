//! Request classification subsystem.
//!
//! Decides how each inbound request is handled: release-asset paths are
//! resolved through the GitHub API, raw and git paths get credentials
//! injected before proxying, everything else is proxied untouched.

pub mod classifier;

pub use classifier::{classify, ReleaseAssetRequest, RequestCategory};
