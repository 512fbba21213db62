//! Scripted mock provider for testing.
//!
//! Responses are registered up front; unscripted lookups return empty pages
//! or `NotFound`. Individual operations can be forced to fail, and searches
//! for a query can be held on a gate to force out-of-order completion.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use cinedeck_core::ResultPage;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::MediaApiProvider;
use crate::errors::MediaSearchError;
use crate::types::{
    DiscoverFilter, MediaDetails, MediaKind, MediaKey, PersonCredit, PersonDetails,
    SearchResultItem, Video,
};

/// Provider operations that can be scripted to fail or counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Trending,
    Popular,
    MultiSearch,
    SearchKind,
    Details,
    Videos,
    Person,
    PersonCredits,
    Discover,
}

#[derive(Debug, Default)]
struct MockState {
    listings: HashMap<MockOperation, ResultPage<SearchResultItem>>,
    searches: HashMap<(String, u32), ResultPage<SearchResultItem>>,
    credits: HashMap<u64, Vec<PersonCredit>>,
    details: HashMap<MediaKey, MediaDetails>,
    videos: HashMap<MediaKey, Vec<Video>>,
    persons: HashMap<u64, PersonDetails>,
    failing: HashSet<MockOperation>,
    gates: HashMap<String, Arc<Notify>>,
    calls: HashMap<MockOperation, usize>,
    discover_filters: Vec<DiscoverFilter>,
}

/// Mock provider with scripted responses.
#[derive(Debug, Default)]
pub struct MockProvider {
    state: Mutex<MockState>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page returned by `trending`, `popular`, `search_kind` or `discover`.
    pub fn with_listing(self, operation: MockOperation, page: ResultPage<SearchResultItem>) -> Self {
        self.state.lock().listings.insert(operation, page);
        self
    }

    /// Page returned by `multi_search` for `(query, page)`.
    pub fn with_search(self, query: &str, page: u32, result: ResultPage<SearchResultItem>) -> Self {
        self.state
            .lock()
            .searches
            .insert((query.to_string(), page), result);
        self
    }

    pub fn with_credits(self, person_id: u64, credits: Vec<PersonCredit>) -> Self {
        self.state.lock().credits.insert(person_id, credits);
        self
    }

    pub fn with_details(self, details: MediaDetails) -> Self {
        let key = MediaKey::new(details.kind, details.id);
        self.state.lock().details.insert(key, details);
        self
    }

    pub fn with_videos(self, kind: MediaKind, id: u64, videos: Vec<Video>) -> Self {
        self.state
            .lock()
            .videos
            .insert(MediaKey::new(kind, id), videos);
        self
    }

    pub fn with_person(self, person: PersonDetails) -> Self {
        self.state.lock().persons.insert(person.id, person);
        self
    }

    /// Makes every call to `operation` fail with an upstream error.
    pub fn failing(self, operation: MockOperation) -> Self {
        self.state.lock().failing.insert(operation);
        self
    }

    /// Holds `multi_search` calls for `query` until the returned gate is notified.
    pub fn gate(&self, query: &str) -> Arc<Notify> {
        Arc::clone(
            self.state
                .lock()
                .gates
                .entry(query.to_string())
                .or_insert_with(|| Arc::new(Notify::new())),
        )
    }

    pub fn call_count(&self, operation: MockOperation) -> usize {
        self.state
            .lock()
            .calls
            .get(&operation)
            .copied()
            .unwrap_or_default()
    }

    /// Filters received by `discover`, in call order.
    pub fn discover_filters(&self) -> Vec<DiscoverFilter> {
        self.state.lock().discover_filters.clone()
    }

    fn record(&self, operation: MockOperation) -> Result<(), MediaSearchError> {
        let mut state = self.state.lock();
        *state.calls.entry(operation).or_default() += 1;
        if state.failing.contains(&operation) {
            return Err(MediaSearchError::Upstream {
                status: Some(503),
                reason: format!("scripted failure for {operation:?}"),
            });
        }
        Ok(())
    }

    fn listing(&self, operation: MockOperation) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.record(operation)?;
        Ok(self
            .state
            .lock()
            .listings
            .get(&operation)
            .cloned()
            .unwrap_or_else(ResultPage::empty))
    }
}

#[async_trait]
impl MediaApiProvider for MockProvider {
    async fn trending(&self, _page: u32) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.listing(MockOperation::Trending)
    }

    async fn popular(
        &self,
        _kind: MediaKind,
        _page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.listing(MockOperation::Popular)
    }

    async fn multi_search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        let gate = self.state.lock().gates.get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.record(MockOperation::MultiSearch)?;
        Ok(self
            .state
            .lock()
            .searches
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_else(ResultPage::empty))
    }

    async fn search_kind(
        &self,
        _kind: MediaKind,
        _query: &str,
        _page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.listing(MockOperation::SearchKind)
    }

    async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetails, MediaSearchError> {
        self.record(MockOperation::Details)?;
        self.state
            .lock()
            .details
            .get(&MediaKey::new(kind, id))
            .cloned()
            .ok_or_else(|| MediaSearchError::NotFound {
                resource: format!("/{}/{id}", kind.as_str()),
            })
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> Result<Vec<Video>, MediaSearchError> {
        self.record(MockOperation::Videos)?;
        Ok(self
            .state
            .lock()
            .videos
            .get(&MediaKey::new(kind, id))
            .cloned()
            .unwrap_or_default())
    }

    async fn person(&self, id: u64) -> Result<PersonDetails, MediaSearchError> {
        self.record(MockOperation::Person)?;
        self.state
            .lock()
            .persons
            .get(&id)
            .cloned()
            .ok_or_else(|| MediaSearchError::NotFound {
                resource: format!("/person/{id}"),
            })
    }

    async fn person_credits(&self, id: u64) -> Result<Vec<PersonCredit>, MediaSearchError> {
        self.record(MockOperation::PersonCredits)?;
        Ok(self
            .state
            .lock()
            .credits
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn discover(
        &self,
        _kind: MediaKind,
        filter: &DiscoverFilter,
        _page: u32,
    ) -> Result<ResultPage<SearchResultItem>, MediaSearchError> {
        self.state.lock().discover_filters.push(filter.clone());
        self.listing(MockOperation::Discover)
    }
}
