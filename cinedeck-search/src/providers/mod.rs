//! Provider implementations for the media metadata API.

use async_trait::async_trait;
use cinedeck_core::ResultPage;

use crate::errors::MediaSearchError;
use crate::types::{
    DiscoverFilter, MediaDetails, MediaKind, PersonCredit, PersonDetails, SearchResultItem, Video,
};

pub mod demo;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod tmdb;

pub use demo::DemoProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockOperation, MockProvider};
pub use tmdb::TmdbProvider;

/// Highest page number the upstream API serves for any listing.
pub const MAX_UPSTREAM_PAGE: u32 = 500;

/// Raw operations offered by a media metadata backend.
///
/// Implementations provide the lookups through different backends (the real
/// upstream API, the offline demo catalog, scripted mocks for testing).
/// Pages are passed through as returned; callers apply pagination rules.
#[async_trait]
pub trait MediaApiProvider: Send + Sync + std::fmt::Debug {
    /// Weekly trending movies.
    ///
    /// # Errors
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn trending(&self, page: u32) -> Result<ResultPage<SearchResultItem>, MediaSearchError>;

    /// Popular movies or series.
    ///
    /// # Errors
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn popular(
        &self,
        kind: MediaKind,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError>;

    /// Free-text search across movies, series and people.
    ///
    /// # Errors
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn multi_search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError>;

    /// Free-text search restricted to one title kind.
    ///
    /// # Errors
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn search_kind(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError>;

    /// Full record of a movie or series with videos and cast.
    ///
    /// # Errors
    /// - `MediaSearchError::NotFound` - The title does not exist
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetails, MediaSearchError>;

    /// Videos attached to a movie or series.
    ///
    /// # Errors
    /// - `MediaSearchError::NotFound` - The title does not exist
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn videos(&self, kind: MediaKind, id: u64) -> Result<Vec<Video>, MediaSearchError>;

    /// Biographical record of a person.
    ///
    /// # Errors
    /// - `MediaSearchError::NotFound` - The person does not exist
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn person(&self, id: u64) -> Result<PersonDetails, MediaSearchError>;

    /// Combined cast and crew credits of a person, cast first.
    ///
    /// # Errors
    /// - `MediaSearchError::NotFound` - The person does not exist
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn person_credits(&self, id: u64) -> Result<Vec<PersonCredit>, MediaSearchError>;

    /// Titles matching a discovery filter.
    ///
    /// # Errors
    /// - `MediaSearchError::Upstream` - Non-success status or transport failure
    async fn discover(
        &self,
        kind: MediaKind,
        filter: &DiscoverFilter,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError>;
}
