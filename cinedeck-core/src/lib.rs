//! Cinedeck Core - Shared building blocks for the browsing service
//!
//! This crate provides the pieces every Cinedeck component leans on:
//! configuration, runtime mode selection, tracing setup, the pagination
//! window helpers, and the request-ordered listing state used to discard
//! stale responses.

pub mod config;
pub mod listing;
pub mod mode;
pub mod pagination;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::CinedeckConfig;
pub use listing::{Listing, ListingSnapshot, RequestTicket};
pub use mode::RuntimeMode;
pub use pagination::{ResultPage, clamp_page, floor_total_pages, page_window, total_pages_for};

/// Core errors that can bubble up from configuration and process setup.
#[derive(Debug, thiserror::Error)]
pub enum CinedeckError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tracing setup failed: {reason}")]
    Tracing { reason: String },
}

impl CinedeckError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CinedeckError::Configuration { reason } => format!("Configuration error: {reason}"),
            CinedeckError::Io(_) => "File system error occurred".to_string(),
            CinedeckError::Tracing { .. } => "Could not initialize logging".to_string(),
        }
    }

    /// Checks if this error is due to operator input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CinedeckError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, CinedeckError>;
