//! Router assembly and server startup

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use cinedeck_core::{CinedeckConfig, RuntimeMode};
use cinedeck_search::MediaSearchService;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{TokenVerifier, auth_gate};
use crate::errors::WebError;
use crate::handlers::{
    api_discover, api_health, api_home, api_person, api_popular, api_search, api_search_kind,
    api_title, api_trailer, api_trending, home_page, login_page, register_page,
};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub search: MediaSearchService,
    pub config: Arc<CinedeckConfig>,
    pub mode: RuntimeMode,
    pub verifier: Option<TokenVerifier>,
}

impl AppState {
    pub fn new(search: MediaSearchService, config: CinedeckConfig, mode: RuntimeMode) -> Self {
        let verifier = TokenVerifier::from_config(&config.auth);
        Self {
            search,
            config: Arc::new(config),
            mode,
            verifier,
        }
    }
}

/// Builds the application router with the route gate, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let login_path = state.config.auth.login_path.clone();

    Router::new()
        // Pages
        .route("/", get(home_page))
        .route(&login_path, get(login_page))
        .route("/register", get(register_page))
        // JSON API
        .route("/api/health", get(api_health))
        .route("/api/home", get(api_home))
        .route("/api/trending", get(api_trending))
        .route("/api/popular/{kind}", get(api_popular))
        .route("/api/discover/{kind}", get(api_discover))
        .route("/api/search", get(api_search))
        .route("/api/search/{kind}", get(api_search_kind))
        .route("/api/title/{kind}/{id}", get(api_title))
        .route("/api/title/{kind}/{id}/trailer", get(api_trailer))
        .route("/api/person/{id}", get(api_person))
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Runs the API server until the process is stopped.
///
/// # Errors
///
/// - `WebError::Setup` - Invalid configuration or missing API credential
/// - `WebError::Bind` - The listen address is unavailable
/// - `WebError::Serve` - The server stopped with an I/O error
pub async fn run_server(config: CinedeckConfig, mode: RuntimeMode) -> Result<(), WebError> {
    let search = MediaSearchService::from_config(mode, &config)?;
    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(search, config, mode);

    if state.verifier.is_none() {
        info!("Route gate disabled, no token secret configured");
    }

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| WebError::Bind {
            address: address.clone(),
            source,
        })?;
    info!(%mode, "Cinedeck API listening on http://{address}");

    axum::serve(listener, build_router(state))
        .await
        .map_err(WebError::Serve)
}
