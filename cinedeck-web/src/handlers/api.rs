//! JSON API handlers for listings, search and detail lookups

use axum::Json;
use axum::extract::{Path, Query, State};
use cinedeck_core::ResultPage;
use cinedeck_search::{DiscoverFilter, MediaKind, MediaSearchError, SearchResultItem};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::errors::ApiError;
use crate::server::AppState;
use crate::views::{DetailsView, HomeView, ListingView, PersonView, SearchView, TrailerView};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    pub page: Option<i64>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub sort_by: Option<String>,
}

impl DiscoverQuery {
    fn filter(&self) -> DiscoverFilter {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        DiscoverFilter {
            original_language: non_blank(&self.language),
            region: non_blank(&self.region),
            sort_by: non_blank(&self.sort_by),
        }
    }
}

fn parse_kind(raw: &str) -> Result<MediaKind, ApiError> {
    Ok(raw.parse::<MediaKind>()?.require_title()?)
}

/// Renders a listing result; failures other than a bad kind become an
/// empty page carrying the error code.
fn listing(
    state: &AppState,
    section: &'static str,
    result: Result<ResultPage<SearchResultItem>, MediaSearchError>,
) -> Result<Json<ListingView>, ApiError> {
    match result {
        Ok(page) => Ok(Json(ListingView::new(page, state.search.images()))),
        Err(err @ MediaSearchError::InvalidMediaType { .. }) => Err(err.into()),
        Err(err) => {
            warn!(section, error = %err, "Listing unavailable, showing empty page");
            Ok(Json(ListingView::failed(err.code())))
        }
    }
}

pub async fn api_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "mode": state.mode.to_string(),
    }))
}

pub async fn api_home(State(state): State<AppState>) -> Json<HomeView> {
    let feed = state.search.home_feed().await;
    Json(HomeView::new(feed, state.search.images()))
}

pub async fn api_trending(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ListingView>, ApiError> {
    let result = state.search.fetch_trending(params.page.unwrap_or(1)).await;
    listing(&state, "trending", result)
}

pub async fn api_popular(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ListingView>, ApiError> {
    let kind = parse_kind(&kind)?;
    let result = state
        .search
        .fetch_popular(kind, params.page.unwrap_or(1))
        .await;
    listing(&state, "popular", result)
}

pub async fn api_discover(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<DiscoverQuery>,
) -> Result<Json<ListingView>, ApiError> {
    let kind = parse_kind(&kind)?;
    let result = state
        .search
        .fetch_discover(kind, &params.filter(), params.page.unwrap_or(1))
        .await;
    listing(&state, "discover", result)
}

/// Aggregated search. Base search failures render as an empty result page.
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchView> {
    match state
        .search
        .search(&params.query, params.page.unwrap_or(1))
        .await
    {
        Ok(aggregated) => Json(SearchView::new(aggregated, state.search.images())),
        Err(err) => {
            warn!(query = %params.query, error = %err, "Search unavailable, showing empty page");
            Json(SearchView::failed(&params.query, err.code()))
        }
    }
}

pub async fn api_search_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ListingView>, ApiError> {
    let kind = parse_kind(&kind)?;
    let result = state
        .search
        .fetch_search_by_kind(kind, &params.query, params.page.unwrap_or(1))
        .await;
    listing(&state, "search", result)
}

pub async fn api_title(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, u64)>,
) -> Result<Json<DetailsView>, ApiError> {
    let kind = parse_kind(&kind)?;
    let details = state.search.fetch_details(kind, id).await?;
    Ok(Json(DetailsView::new(details, state.search.images())))
}

pub async fn api_trailer(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, u64)>,
) -> Result<Json<TrailerView>, ApiError> {
    let kind = parse_kind(&kind)?;
    let key = state.search.fetch_trailer_key(kind, id).await?;
    Ok(Json(TrailerView::new(key)))
}

pub async fn api_person(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PersonView>, ApiError> {
    let profile = state.search.fetch_person(id).await?;
    Ok(Json(PersonView::new(profile, state.search.images())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_query_drops_blank_options() {
        let query = DiscoverQuery {
            page: None,
            language: Some("ko".to_string()),
            region: Some("  ".to_string()),
            sort_by: None,
        };
        assert_eq!(query.filter(), DiscoverFilter::language("ko"));
    }

    #[test]
    fn test_parse_kind_rejects_people_and_unknown() {
        assert_eq!(parse_kind("tv").unwrap(), MediaKind::Series);
        assert!(parse_kind("person").is_err());
        assert!(parse_kind("album").is_err());
    }
}
