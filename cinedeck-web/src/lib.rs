//! Cinedeck Web - JSON API Server

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Serves the media browsing API: listings, aggregated search, title and
//! person details, behind a token-verifying route gate.

pub mod auth;
pub mod errors;
pub mod handlers;
pub mod server;
pub mod views;

// Re-export main types
pub use auth::{Claims, TokenError, TokenVerifier};
pub use errors::{ApiError, WebError};
pub use server::{AppState, build_router, run_server};
