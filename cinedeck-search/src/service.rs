//! Media search service.
//!
//! Front door used by the web and CLI layers. Wraps a provider with the
//! pagination rules every listing shares, the search aggregator, and the
//! composite lookups (person profile, home feed).

use std::future::Future;
use std::sync::Arc;

use cinedeck_core::config::SearchConfig;
use cinedeck_core::{CinedeckConfig, ResultPage, RuntimeMode, clamp_page};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{AggregationState, SearchAggregator};
use crate::errors::MediaSearchError;
use crate::images::ImageUrls;
use crate::providers::{DemoProvider, MAX_UPSTREAM_PAGE, MediaApiProvider, TmdbProvider};
use crate::types::{
    DiscoverFilter, MediaDetails, MediaKind, PersonCredit, PersonDetails, SearchResultItem,
    select_trailer,
};

/// Discovery preset shown on the home feed.
#[derive(Debug, Clone, Copy)]
struct HomePreset {
    id: &'static str,
    title: &'static str,
    kind: MediaKind,
    language: Option<&'static str>,
    region: Option<&'static str>,
}

impl HomePreset {
    fn filter(&self) -> DiscoverFilter {
        DiscoverFilter {
            original_language: self.language.map(str::to_string),
            region: self.region.map(str::to_string),
            sort_by: None,
        }
    }
}

const HOME_PRESETS: [HomePreset; 3] = [
    HomePreset {
        id: "korean-drama",
        title: "Korean Drama",
        kind: MediaKind::Series,
        language: Some("ko"),
        region: None,
    },
    HomePreset {
        id: "chinese-drama",
        title: "Chinese Drama",
        kind: MediaKind::Series,
        language: Some("zh"),
        region: None,
    },
    HomePreset {
        id: "hollywood",
        title: "Hollywood",
        kind: MediaKind::Movie,
        language: None,
        region: Some("US"),
    },
];

/// One discovery row of the home feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeSection {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: MediaKind,
    pub items: Vec<SearchResultItem>,
}

/// Landing page content: trending titles plus discovery rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeFeed {
    pub trending: Vec<SearchResultItem>,
    pub sections: Vec<HomeSection>,
}

/// Person record with the titles they are best known for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonProfile {
    pub details: PersonDetails,
    pub known_for: Vec<SearchResultItem>,
}

/// Cast credits ordered by popularity, most popular first.
pub fn known_for(credits: Vec<PersonCredit>, limit: usize) -> Vec<SearchResultItem> {
    let mut titles: Vec<_> = credits
        .into_iter()
        .filter(PersonCredit::is_cast)
        .map(|credit| credit.item)
        .collect();
    titles.sort_by(|a, b| {
        b.popularity
            .unwrap_or_default()
            .total_cmp(&a.popularity.unwrap_or_default())
    });
    let mut titles = crate::aggregator::dedupe_by_key(titles);
    titles.truncate(limit);
    titles
}

/// Media lookups with shared pagination rules.
#[derive(Debug, Clone)]
pub struct MediaSearchService {
    provider: Arc<dyn MediaApiProvider>,
    aggregator: SearchAggregator,
    settings: SearchConfig,
    images: ImageUrls,
}

impl MediaSearchService {
    pub fn new(provider: Arc<dyn MediaApiProvider>, config: &CinedeckConfig) -> Self {
        let aggregator = SearchAggregator::new(Arc::clone(&provider), config.search.page_size);
        Self {
            provider,
            aggregator,
            settings: config.search.clone(),
            images: ImageUrls::from_config(&config.api),
        }
    }

    /// Creates the service for a runtime mode.
    ///
    /// Production talks to the upstream API; development serves the
    /// built-in demo catalog.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::Configuration` - Invalid configuration or missing credential
    pub fn from_config(mode: RuntimeMode, config: &CinedeckConfig) -> Result<Self, MediaSearchError> {
        config.validate(mode)?;
        let provider: Arc<dyn MediaApiProvider> = match mode {
            RuntimeMode::Production => Arc::new(TmdbProvider::from_config(&config.api)?),
            RuntimeMode::Development => Arc::new(DemoProvider::new()),
        };
        info!(%mode, base_url = %config.api.base_url, "Media search service ready");
        Ok(Self::new(provider, config))
    }

    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    pub fn aggregator(&self) -> &SearchAggregator {
        &self.aggregator
    }

    /// Fetches a listing page, clamping the request into the served range.
    ///
    /// A page past the reported end is re-requested at the last page.
    async fn paged<F, Fut>(
        &self,
        page: i64,
        fetch: F,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError>
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = Result<ResultPage<SearchResultItem>, MediaSearchError>>,
    {
        let requested = clamp_page(page, MAX_UPSTREAM_PAGE);
        let mut result = fetch(requested).await?;
        let last = clamp_page(i64::from(result.total_pages), MAX_UPSTREAM_PAGE);
        if result.total_pages > 0 && requested > last {
            debug!(requested, last, "Requested page past the end, refetching last page");
            result = fetch(last).await?;
        }
        result.page = requested.min(last);
        result.total_pages = result.total_pages.min(MAX_UPSTREAM_PAGE);
        Ok(result.normalized())
    }

    /// Weekly trending movies.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_trending(
        &self,
        page: i64,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.paged(page, |p| self.provider.trending(p)).await
    }

    /// Popular movies or series.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::InvalidMediaType` - `kind` is a person
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_popular(
        &self,
        kind: MediaKind,
        page: i64,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        self.paged(page, |p| self.provider.popular(kind, p)).await
    }

    /// Raw multi-search page; blank queries return an empty page offline.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_multi_search(
        &self,
        query: &str,
        page: i64,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(ResultPage::empty());
        }
        self.paged(page, |p| self.provider.multi_search(query, p)).await
    }

    /// Search restricted to movies or series; blank queries return an empty page.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::InvalidMediaType` - `kind` is a person
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_search_by_kind(
        &self,
        kind: MediaKind,
        query: &str,
        page: i64,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(ResultPage::empty());
        }
        self.paged(page, |p| self.provider.search_kind(kind, query, p))
            .await
    }

    /// Discovery listing for a filter.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::InvalidMediaType` - `kind` is a person
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_discover(
        &self,
        kind: MediaKind,
        filter: &DiscoverFilter,
        page: i64,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let kind = kind.require_title()?;
        self.paged(page, |p| self.provider.discover(kind, filter, p))
            .await
    }

    /// Full record of a movie or series.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::NotFound` - The title does not exist
    /// - `MediaSearchError::InvalidMediaType` - `kind` is a person
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_details(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<MediaDetails, MediaSearchError> {
        self.provider.details(kind.require_title()?, id).await
    }

    /// Key of the first playable trailer, `None` when the title has none.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::NotFound` - The title does not exist
    /// - `MediaSearchError::InvalidMediaType` - `kind` is a person
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_trailer_key(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<Option<String>, MediaSearchError> {
        let videos = self.provider.videos(kind.require_title()?, id).await?;
        Ok(select_trailer(&videos).map(|video| video.key.clone()))
    }

    /// Combined credits of a person, cast first.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::NotFound` - The person does not exist
    /// - `MediaSearchError::Upstream` - The upstream request failed
    pub async fn fetch_person_credits(
        &self,
        id: u64,
    ) -> Result<Vec<PersonCredit>, MediaSearchError> {
        self.provider.person_credits(id).await
    }

    /// Person details and "known for" titles, fetched concurrently.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::NotFound` - The person does not exist
    /// - `MediaSearchError::Upstream` - Either upstream request failed
    pub async fn fetch_person(&self, id: u64) -> Result<PersonProfile, MediaSearchError> {
        let (details, credits) =
            tokio::try_join!(self.provider.person(id), self.provider.person_credits(id))?;
        Ok(PersonProfile {
            details,
            known_for: known_for(credits, self.settings.known_for_limit),
        })
    }

    /// Aggregated search with person expansion.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::Upstream` - The base multi-search request failed
    pub async fn search(
        &self,
        query: &str,
        page: i64,
    ) -> Result<AggregationState, MediaSearchError> {
        self.aggregator.aggregate(query, page).await
    }

    /// Trending titles and the discovery rows, fetched concurrently.
    ///
    /// A failing row is logged and shown empty.
    pub async fn home_feed(&self) -> HomeFeed {
        let limit = self.settings.home_section_size;
        let [korean, chinese, hollywood] = HOME_PRESETS;
        let (trending, korean_rows, chinese_rows, hollywood_rows) = tokio::join!(
            self.fetch_trending(1),
            self.preset_row(korean),
            self.preset_row(chinese),
            self.preset_row(hollywood),
        );

        let trending = trending
            .map(|page| page.truncated(limit).items)
            .unwrap_or_else(|err| {
                warn!(error = %err, "Trending row unavailable");
                Vec::new()
            });

        HomeFeed {
            trending,
            sections: vec![korean_rows, chinese_rows, hollywood_rows],
        }
    }

    async fn preset_row(&self, preset: HomePreset) -> HomeSection {
        let items = match self.fetch_discover(preset.kind, &preset.filter(), 1).await {
            Ok(page) => page.truncated(self.settings.home_section_size).items,
            Err(err) => {
                warn!(section = preset.id, error = %err, "Home section unavailable");
                Vec::new()
            }
        };
        HomeSection {
            id: preset.id,
            title: preset.title,
            kind: preset.kind,
            items,
        }
    }
}
