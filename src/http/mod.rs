//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum setup, classification, dispatch)
//!     → release-asset path: upstream::releases (terminal)
//!     → other paths: auth (header injection) → forward.rs → upstream
//!     → response streamed back to client
//! ```

pub mod forward;
pub mod server;

pub use forward::Forwarder;
pub use server::{AppState, HttpServer};
