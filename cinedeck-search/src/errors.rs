//! Error types for media lookups and search aggregation.

use thiserror::Error;

/// Errors that can occur while talking to the media metadata API.
#[derive(Debug, Error)]
pub enum MediaSearchError {
    /// Upstream returned a non-success status, the transport failed, or the
    /// response body could not be decoded.
    #[error("Upstream error{}: {reason}", status_suffix(.status))]
    Upstream {
        /// HTTP status when one was received
        status: Option<u16>,
        /// The reason for the failure
        reason: String,
    },

    /// Upstream reported that the requested entity does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was requested
        resource: String,
    },

    /// Looking up a person's credits during search expansion failed.
    #[error("Credit expansion failed for person {person_id}: {reason}")]
    ExpansionFailed {
        /// The person whose credits were requested
        person_id: u64,
        /// The reason for the failure
        reason: String,
    },

    /// Missing or invalid API credential or client setup.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// The reason for the configuration failure
        reason: String,
    },

    /// Media kind not valid for the requested operation.
    #[error("Invalid media type: {media_type}")]
    InvalidMediaType {
        /// The invalid media type that was specified
        media_type: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl MediaSearchError {
    /// Short machine-readable code for user-facing payloads.
    pub fn code(&self) -> &'static str {
        match self {
            MediaSearchError::Upstream { .. } => "upstream_unavailable",
            MediaSearchError::NotFound { .. } => "not_found",
            MediaSearchError::ExpansionFailed { .. } => "expansion_failed",
            MediaSearchError::Configuration { .. } => "configuration",
            MediaSearchError::InvalidMediaType { .. } => "invalid_media_type",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MediaSearchError::NotFound { .. })
    }
}

impl From<cinedeck_core::CinedeckError> for MediaSearchError {
    fn from(error: cinedeck_core::CinedeckError) -> Self {
        let reason = match error {
            cinedeck_core::CinedeckError::Configuration { reason } => reason,
            other => other.to_string(),
        };
        MediaSearchError::Configuration { reason }
    }
}
