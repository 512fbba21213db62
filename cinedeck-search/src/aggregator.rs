//! Search aggregation with person filmography expansion.
//!
//! A free-text query is answered from the first multi-search page. When that
//! page contains a person, the first such person's combined credits are
//! merged in and the merged list is paginated locally; otherwise the
//! upstream pagination is passed through.

use std::collections::HashSet;
use std::sync::Arc;

use cinedeck_core::{ResultPage, clamp_page, floor_total_pages, page_window, total_pages_for};
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::MediaSearchError;
use crate::providers::{MAX_UPSTREAM_PAGE, MediaApiProvider};
use crate::types::{PersonCredit, SearchResultItem};

/// Where the page window of an aggregated result comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Upstream page passed through with upstream totals.
    Server,
    /// Merged list windowed locally in fixed-size pages.
    Client,
}

/// Result of aggregating one `(query, page)` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationState {
    pub query: String,
    pub items: Vec<SearchResultItem>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub mode: PaginationMode,
    /// Person whose credits were merged in, if any
    pub expanded_person: Option<u64>,
}

impl AggregationState {
    /// Zero-result state displayed as "page 1 of 1".
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_results: 0,
            mode: PaginationMode::Server,
            expanded_person: None,
        }
    }

    pub fn into_page(self) -> ResultPage<SearchResultItem> {
        ResultPage {
            items: self.items,
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

/// Removes repeated `(kind, id)` pairs, keeping the first occurrence.
pub fn dedupe_by_key(items: impl IntoIterator<Item = SearchResultItem>) -> Vec<SearchResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.key()))
        .collect()
}

/// Builds the merged list: person, then credits, then the rest of the base page.
pub fn merge_results(
    person: &SearchResultItem,
    credits: Vec<PersonCredit>,
    base: &[SearchResultItem],
) -> Vec<SearchResultItem> {
    let person_key = person.key();
    let merged = std::iter::once(person.clone())
        .chain(credits.into_iter().map(|credit| credit.item))
        .chain(base.iter().filter(|item| item.key() != person_key).cloned());
    dedupe_by_key(merged)
}

/// Turns multi-search responses into unified, paginated result lists.
#[derive(Debug, Clone)]
pub struct SearchAggregator {
    provider: Arc<dyn MediaApiProvider>,
    page_size: usize,
}

impl SearchAggregator {
    pub fn new(provider: Arc<dyn MediaApiProvider>, page_size: usize) -> Self {
        Self {
            provider,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Aggregates results for `query` at the requested `page`.
    ///
    /// Blank queries return an empty state without touching the network.
    /// A failed credit expansion is logged and the unexpanded results are
    /// returned instead.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::Upstream` - The multi-search request failed
    pub async fn aggregate(
        &self,
        query: &str,
        page: i64,
    ) -> Result<AggregationState, MediaSearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(AggregationState::empty(query));
        }

        let base = self.provider.multi_search(query, 1).await?;
        debug!(
            query,
            base_results = base.items.len(),
            total_pages = base.total_pages,
            "Multi-search base page received"
        );

        let Some(person) = base.items.iter().find(|item| item.is_person()).cloned() else {
            return self.server_window(query, page, base).await;
        };

        match self.provider.person_credits(person.id).await {
            Ok(credits) => Ok(self.client_window(query, page, &person, credits, &base.items)),
            Err(err) => {
                let err = MediaSearchError::ExpansionFailed {
                    person_id: person.id,
                    reason: err.to_string(),
                };
                warn!(query, error = %err, "Continuing with unexpanded search results");
                self.server_window(query, page, base).await
            }
        }
    }

    fn client_window(
        &self,
        query: &str,
        page: i64,
        person: &SearchResultItem,
        credits: Vec<PersonCredit>,
        base: &[SearchResultItem],
    ) -> AggregationState {
        let merged = merge_results(person, credits, base);
        let total_pages = total_pages_for(merged.len(), self.page_size);
        let page = clamp_page(page, total_pages);

        AggregationState {
            query: query.to_string(),
            items: page_window(&merged, page, self.page_size).to_vec(),
            page,
            total_pages,
            total_results: merged.len() as u64,
            mode: PaginationMode::Client,
            expanded_person: Some(person.id),
        }
    }

    async fn server_window(
        &self,
        query: &str,
        page: i64,
        base: ResultPage<SearchResultItem>,
    ) -> Result<AggregationState, MediaSearchError> {
        let page = clamp_page(page, base.total_pages.min(MAX_UPSTREAM_PAGE));
        let window = if page == 1 {
            base
        } else {
            self.provider.multi_search(query, page).await?
        };

        Ok(AggregationState {
            query: query.to_string(),
            items: dedupe_by_key(window.items),
            page,
            total_pages: floor_total_pages(window.total_pages.min(MAX_UPSTREAM_PAGE)),
            total_results: window.total_results,
            mode: PaginationMode::Server,
            expanded_person: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::providers::{MockOperation, MockProvider};
    use crate::types::{CreditRole, MediaKind, ReleaseYear};

    fn item(kind: MediaKind, id: u64) -> SearchResultItem {
        SearchResultItem {
            kind,
            id,
            title: format!("{kind}-{id}"),
            release_year: ReleaseYear::Unknown,
            image_path: None,
            rating: None,
            popularity: None,
        }
    }

    fn cast(kind: MediaKind, id: u64) -> PersonCredit {
        PersonCredit {
            item: item(kind, id),
            role: CreditRole::Cast { character: None },
        }
    }

    fn page_of(items: Vec<SearchResultItem>, total_pages: u32) -> ResultPage<SearchResultItem> {
        let total_results = items.len() as u64;
        ResultPage {
            items,
            page: 1,
            total_pages,
            total_results,
        }
    }

    fn aggregator(provider: MockProvider) -> (SearchAggregator, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        (SearchAggregator::new(provider.clone(), 20), provider)
    }

    #[tokio::test]
    async fn test_person_expansion_merges_and_dedupes() {
        let (aggregator, _) = aggregator(
            MockProvider::new()
                .with_search(
                    "person-X",
                    1,
                    page_of(vec![item(MediaKind::Person, 7), item(MediaKind::Movie, 101)], 1),
                )
                .with_credits(
                    7,
                    vec![cast(MediaKind::Movie, 101), cast(MediaKind::Series, 55)],
                ),
        );

        let state = aggregator.aggregate("person-X", 1).await.unwrap();
        let keys: Vec<_> = state.items.iter().map(|i| (i.kind, i.id)).collect();

        assert_eq!(
            keys,
            vec![
                (MediaKind::Person, 7),
                (MediaKind::Movie, 101),
                (MediaKind::Series, 55)
            ]
        );
        assert_eq!(state.mode, PaginationMode::Client);
        assert_eq!(state.expanded_person, Some(7));
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.total_results, 3);
    }

    #[tokio::test]
    async fn test_only_first_person_is_expanded() {
        let (aggregator, provider) = aggregator(
            MockProvider::new()
                .with_search(
                    "smith",
                    1,
                    page_of(vec![item(MediaKind::Person, 1), item(MediaKind::Person, 2)], 1),
                )
                .with_credits(1, vec![cast(MediaKind::Movie, 10)])
                .with_credits(2, vec![cast(MediaKind::Movie, 20)]),
        );

        let state = aggregator.aggregate("smith", 1).await.unwrap();
        let ids: Vec<_> = state.items.iter().map(|i| i.id).collect();

        assert_eq!(ids, vec![1, 10, 2]);
        assert_eq!(provider.call_count(MockOperation::PersonCredits), 1);
    }

    #[tokio::test]
    async fn test_movie_and_series_sharing_an_id_are_distinct() {
        let (aggregator, _) = aggregator(
            MockProvider::new()
                .with_search("x", 1, page_of(vec![item(MediaKind::Person, 3)], 1))
                .with_credits(
                    3,
                    vec![cast(MediaKind::Movie, 42), cast(MediaKind::Series, 42)],
                ),
        );

        let state = aggregator.aggregate("x", 1).await.unwrap();
        assert_eq!(state.items.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_matches_yield_single_empty_page() {
        let (aggregator, _) = aggregator(
            MockProvider::new().with_search("nothing", 1, page_of(Vec::new(), 0)),
        );

        let state = aggregator.aggregate("nothing", 1).await.unwrap();
        assert!(state.items.is_empty());
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.page, 1);
        assert_eq!(state.mode, PaginationMode::Server);
    }

    #[tokio::test]
    async fn test_blank_query_skips_network() {
        let (aggregator, provider) = aggregator(MockProvider::new());

        let state = aggregator.aggregate("   ", 3).await.unwrap();
        assert_eq!(state, AggregationState::empty(""));
        assert_eq!(provider.call_count(MockOperation::MultiSearch), 0);
    }

    #[tokio::test]
    async fn test_expansion_failure_falls_back_to_server_mode() {
        let base = vec![item(MediaKind::Person, 7), item(MediaKind::Movie, 101)];
        let (aggregator, _) = aggregator(
            MockProvider::new()
                .with_search("person-X", 1, page_of(base.clone(), 4))
                .failing(MockOperation::PersonCredits),
        );

        let state = aggregator.aggregate("person-X", 1).await.unwrap();
        assert_eq!(state.items, base);
        assert_eq!(state.mode, PaginationMode::Server);
        assert_eq!(state.total_pages, 4);
        assert_eq!(state.expanded_person, None);
    }

    #[tokio::test]
    async fn test_base_search_failure_aborts() {
        let (aggregator, _) =
            aggregator(MockProvider::new().failing(MockOperation::MultiSearch));

        let result = aggregator.aggregate("anything", 1).await;
        assert!(matches!(result, Err(MediaSearchError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_server_mode_clamps_and_fetches_requested_page() {
        let second = ResultPage {
            items: vec![item(MediaKind::Movie, 2)],
            page: 2,
            total_pages: 2,
            total_results: 21,
        };
        let (aggregator, provider) = aggregator(
            MockProvider::new()
                .with_search("alien", 1, page_of(vec![item(MediaKind::Movie, 1)], 2))
                .with_search("alien", 2, second),
        );

        let state = aggregator.aggregate("alien", 99).await.unwrap();
        assert_eq!(state.page, 2);
        assert_eq!(state.items[0].id, 2);
        assert_eq!(provider.call_count(MockOperation::MultiSearch), 2);

        let first = aggregator.aggregate("alien", -4).await.unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(first.items[0].id, 1);
    }

    #[tokio::test]
    async fn test_server_mode_stays_within_upstream_page_cap() {
        let last = ResultPage {
            items: vec![item(MediaKind::Movie, 500)],
            page: 500,
            total_pages: 1000,
            total_results: 20_000,
        };
        let (aggregator, provider) = aggregator(
            MockProvider::new()
                .with_search("the", 1, page_of(vec![item(MediaKind::Movie, 1)], 1000))
                .with_search("the", 500, last),
        );

        let state = aggregator.aggregate("the", 600).await.unwrap();
        assert_eq!(state.page, MAX_UPSTREAM_PAGE);
        assert_eq!(state.total_pages, MAX_UPSTREAM_PAGE);
        assert_eq!(state.items[0].id, 500);
        assert_eq!(provider.call_count(MockOperation::MultiSearch), 2);

        let first = aggregator.aggregate("the", 1).await.unwrap();
        assert_eq!(first.total_pages, MAX_UPSTREAM_PAGE);
    }

    #[tokio::test]
    async fn test_client_mode_windows_merged_list() {
        let credits = (1..=25).map(|id| cast(MediaKind::Movie, id)).collect();
        let (aggregator, _) = aggregator(
            MockProvider::new()
                .with_search("prolific", 1, page_of(vec![item(MediaKind::Person, 900)], 1))
                .with_credits(900, credits),
        );

        let second = aggregator.aggregate("prolific", 2).await.unwrap();
        assert_eq!(second.total_pages, 2);
        assert_eq!(second.total_results, 26);
        assert_eq!(second.items.len(), 6);
        assert_eq!(second.items[0].id, 20);

        let clamped = aggregator.aggregate("prolific", 10).await.unwrap();
        assert_eq!(clamped, second);
    }

    #[tokio::test]
    async fn test_aggregation_is_idempotent() {
        let (aggregator, _) = aggregator(
            MockProvider::new()
                .with_search(
                    "q",
                    1,
                    page_of(vec![item(MediaKind::Movie, 5), item(MediaKind::Person, 6)], 1),
                )
                .with_credits(6, vec![cast(MediaKind::Series, 8)]),
        );

        let first = aggregator.aggregate("q", 1).await.unwrap();
        let second = aggregator.aggregate("q", 1).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.items[0].kind, MediaKind::Person);
    }

    fn arb_kind() -> impl Strategy<Value = MediaKind> {
        prop_oneof![
            Just(MediaKind::Movie),
            Just(MediaKind::Series),
            Just(MediaKind::Person)
        ]
    }

    proptest! {
        #[test]
        fn merged_list_has_unique_keys_and_person_first(
            credits in prop::collection::vec((arb_kind(), 0u64..20), 0..40),
            base in prop::collection::vec((arb_kind(), 0u64..20), 0..20),
        ) {
            let person = item(MediaKind::Person, 7);
            let credits = credits.into_iter().map(|(k, id)| cast(k, id)).collect();
            let base: Vec<_> = base.into_iter().map(|(k, id)| item(k, id)).collect();

            let merged = merge_results(&person, credits, &base);
            let unique: HashSet<_> = merged.iter().map(SearchResultItem::key).collect();

            prop_assert_eq!(unique.len(), merged.len());
            prop_assert_eq!(merged[0].key(), person.key());
        }
    }
}
