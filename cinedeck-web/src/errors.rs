//! Error responses for the JSON API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinedeck_search::MediaSearchError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Server setup failed: {0}")]
    Setup(#[from] MediaSearchError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Failed lookup rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub MediaSearchError);

impl From<MediaSearchError> for ApiError {
    fn from(error: MediaSearchError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            MediaSearchError::NotFound { .. } => StatusCode::NOT_FOUND,
            MediaSearchError::InvalidMediaType { .. } => StatusCode::BAD_REQUEST,
            MediaSearchError::Upstream { .. } | MediaSearchError::ExpansionFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            MediaSearchError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self.0 {
            MediaSearchError::NotFound { .. } => "Not found",
            MediaSearchError::InvalidMediaType { .. } => "Unsupported media type",
            MediaSearchError::Upstream { .. } | MediaSearchError::ExpansionFailed { .. } => {
                "Media service is unavailable"
            }
            MediaSearchError::Configuration { .. } => "Server is misconfigured",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self.0, "Request failed");
        }
        let body = Json(json!({
            "error": self.0.code(),
            "message": self.message(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError(MediaSearchError::NotFound {
            resource: "/movie/1".to_string(),
        });
        let upstream = ApiError(MediaSearchError::Upstream {
            status: Some(500),
            reason: "boom".to_string(),
        });
        let kind = ApiError(MediaSearchError::InvalidMediaType {
            media_type: "album".to_string(),
        });

        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(kind.status(), StatusCode::BAD_REQUEST);
    }
}
