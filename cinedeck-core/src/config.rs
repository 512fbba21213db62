//! Centralized configuration for Cinedeck.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

use crate::{CinedeckError, RuntimeMode};

/// Central configuration for all Cinedeck components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct CinedeckConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

/// Upstream metadata API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the metadata REST API
    pub base_url: String,
    /// Base URL of the image CDN, without size bucket
    pub image_base_url: String,
    /// API credential sent with every request
    pub api_key: Option<String>,
    /// Response language requested from the upstream
    pub language: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            api_key: None,
            language: "en-US".to_string(),
            timeout: Duration::from_secs(15),
            user_agent: "cinedeck/0.1.0",
        }
    }
}

/// Listing and aggregation sizes.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Items per page for locally windowed listings
    pub page_size: usize,
    /// Items kept per home feed section
    pub home_section_size: usize,
    /// Credits shown in a person's "known for" list
    pub known_for_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            home_section_size: 10,
            known_for_limit: 12,
        }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Token verification settings for the route gate.
///
/// Tokens are issued by an external identity provider; Cinedeck only
/// verifies them. Leaving `token_secret` unset disables the gate.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify token signatures
    pub token_secret: Option<String>,
    /// Where unauthenticated page requests are sent
    pub login_path: String,
    /// Where authenticated visitors of the login pages are sent
    pub home_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
        }
    }
}

impl AuthConfig {
    /// Whether requests must carry a valid token.
    pub fn is_enabled(&self) -> bool {
        self.token_secret
            .as_deref()
            .is_some_and(|secret| !secret.trim().is_empty())
    }
}

impl CinedeckConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("TMDB_API_KEY") {
            config.api.api_key = Some(api_key);
        }

        if let Ok(base_url) = std::env::var("CINEDECK_API_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(image_base_url) = std::env::var("CINEDECK_IMAGE_BASE_URL") {
            config.api.image_base_url = image_base_url;
        }

        if let Ok(language) = std::env::var("CINEDECK_LANGUAGE") {
            config.api.language = language;
        }

        if let Ok(timeout) = std::env::var("CINEDECK_HTTP_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.api.timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(page_size) = std::env::var("CINEDECK_PAGE_SIZE") {
            if let Ok(size) = page_size.parse::<usize>() {
                config.search.page_size = size;
            }
        }

        if let Ok(host) = std::env::var("CINEDECK_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("CINEDECK_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        if let Ok(secret) = std::env::var("CINEDECK_AUTH_SECRET") {
            config.auth.token_secret = Some(secret);
        }

        config
    }

    /// Creates a configuration suitable for tests: dummy credential, auth off.
    pub fn for_testing() -> Self {
        Self {
            api: ApiConfig {
                api_key: Some("test-key".to_string()),
                timeout: Duration::from_secs(2),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Checks the configuration before any component is started.
    ///
    /// # Errors
    ///
    /// - `CinedeckError::Configuration` - Production mode without a usable API
    ///   credential, or a zero page size
    pub fn validate(&self, mode: RuntimeMode) -> Result<(), CinedeckError> {
        if mode.is_production() {
            let has_key = self
                .api
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty());
            if !has_key {
                return Err(CinedeckError::Configuration {
                    reason: "TMDB_API_KEY is missing or blank".to_string(),
                });
            }
        }

        if self.search.page_size == 0 {
            return Err(CinedeckError::Configuration {
                reason: "page size must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
