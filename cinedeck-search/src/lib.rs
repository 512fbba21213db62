//! Cinedeck Search - Media metadata lookups and search aggregation
//!
//! Wraps the upstream metadata API behind a provider trait, applies the
//! shared pagination rules to every listing, and merges person
//! filmographies into free-text search results.

#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod aggregator;
pub mod errors;
pub mod images;
pub mod providers;
pub mod service;
pub mod session;
pub mod types;

// Re-export main types
pub use aggregator::{AggregationState, PaginationMode, SearchAggregator};
pub use errors::MediaSearchError;
pub use images::{ImageSize, ImageUrls, Placeholder, trailer_watch_url};
pub use providers::{DemoProvider, MAX_UPSTREAM_PAGE, MediaApiProvider, TmdbProvider};
#[cfg(any(test, feature = "test-utils"))]
pub use providers::{MockOperation, MockProvider};
pub use service::{HomeFeed, HomeSection, MediaSearchService, PersonProfile};
pub use session::SearchSession;
pub use types::{
    CastMember, CreditRole, DiscoverFilter, MediaDetails, MediaKind, MediaKey, PersonCredit,
    PersonDetails, ReleaseYear, SearchResultItem, Video,
};

/// Convenience type alias for Results with MediaSearchError.
pub type Result<T> = std::result::Result<T, MediaSearchError>;
