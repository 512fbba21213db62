//! Request-ordered listing state.
//!
//! A [`Listing`] is the single writer of a visible result list. Every
//! request takes a [`RequestTicket`] from [`Listing::begin`]; only the
//! newest ticket may commit, so a slow response for a superseded query can
//! never overwrite the result of a newer one. Items, pagination and the
//! loading flag always change together under one lock.

use std::fmt::Display;

use parking_lot::Mutex;

use crate::pagination::{ResultPage, clamp_page, floor_total_pages};

/// Handle for one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    page: u32,
}

impl RequestTicket {
    /// Monotonic request identifier.
    pub fn id(self) -> u64 {
        self.id
    }

    /// Page the request was issued for.
    pub fn page(self) -> u32 {
        self.page
    }
}

/// Point-in-time copy of a listing's visible state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub loading: bool,
    /// Short code of the last committed failure, cleared by the next success.
    pub last_error: Option<String>,
    /// Id of the request whose result is currently shown.
    pub shown_request: Option<u64>,
}

impl<T> ListingSnapshot<T> {
    fn initial() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_results: 0,
            loading: false,
            last_error: None,
            shown_request: None,
        }
    }
}

#[derive(Debug)]
struct ListingState<T> {
    snapshot: ListingSnapshot<T>,
    latest: u64,
}

/// Visible result list guarded by request ordering.
#[derive(Debug)]
pub struct Listing<T> {
    state: Mutex<ListingState<T>>,
}

impl<T: Clone> Listing<T> {
    /// Creates an empty listing showing page 1 of 1.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ListingState {
                snapshot: ListingSnapshot::initial(),
                latest: 0,
            }),
        }
    }

    /// Issues a new request, superseding every earlier ticket.
    ///
    /// Pages below 1 are raised to 1; the upper bound is applied when the
    /// result commits.
    pub fn begin(&self, page: u32) -> RequestTicket {
        let mut state = self.state.lock();
        state.latest += 1;
        state.snapshot.loading = true;
        RequestTicket {
            id: state.latest,
            page: page.max(1),
        }
    }

    /// Whether `ticket` is still the newest request.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.state.lock().latest == ticket.id
    }

    /// Applies a request outcome if its ticket is still current.
    ///
    /// Failures reset the list to empty with a single page and record the
    /// error's display form, which callers keep to a short code. Returns
    /// `false` when the outcome was stale and dropped.
    pub fn commit<E: Display>(
        &self,
        ticket: RequestTicket,
        outcome: Result<ResultPage<T>, E>,
    ) -> bool {
        let mut state = self.state.lock();
        if state.latest != ticket.id {
            tracing::debug!(
                request = ticket.id,
                latest = state.latest,
                "Dropping superseded listing result"
            );
            return false;
        }

        let snapshot = &mut state.snapshot;
        match outcome {
            Ok(page) => {
                snapshot.total_pages = floor_total_pages(page.total_pages);
                snapshot.page = clamp_page(i64::from(page.page), snapshot.total_pages);
                snapshot.total_results = page.total_results;
                snapshot.items = page.items;
                snapshot.last_error = None;
            }
            Err(error) => {
                tracing::warn!(request = ticket.id, %error, "Listing request failed");
                snapshot.items.clear();
                snapshot.page = 1;
                snapshot.total_pages = 1;
                snapshot.total_results = 0;
                snapshot.last_error = Some(error.to_string());
            }
        }
        snapshot.loading = false;
        snapshot.shown_request = Some(ticket.id);
        true
    }

    /// Copies the visible state.
    pub fn snapshot(&self) -> ListingSnapshot<T> {
        self.state.lock().snapshot.clone()
    }
}

impl<T: Clone> Default for Listing<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::oneshot;

    use super::*;

    fn page_of(items: Vec<&'static str>, page: u32, total_pages: u32) -> ResultPage<&'static str> {
        let total_results = items.len() as u64;
        ResultPage {
            items,
            page,
            total_pages,
            total_results,
        }
    }

    #[test]
    fn test_begin_sets_loading() {
        let listing = Listing::<&str>::new();
        let ticket = listing.begin(0);

        assert_eq!(ticket.page(), 1);
        assert!(listing.snapshot().loading);
        assert!(listing.is_current(ticket));
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let listing = Listing::new();
        let first = listing.begin(1);
        let second = listing.begin(1);

        assert!(listing.commit::<String>(second, Ok(page_of(vec!["b"], 1, 1))));
        assert!(!listing.commit::<String>(first, Ok(page_of(vec!["a"], 1, 1))));

        let snapshot = listing.snapshot();
        assert_eq!(snapshot.items, vec!["b"]);
        assert_eq!(snapshot.shown_request, Some(second.id()));
        assert!(!snapshot.loading);
    }

    #[test]
    fn test_superseded_request_keeps_loading_until_newest_resolves() {
        let listing = Listing::new();
        let first = listing.begin(1);
        let _second = listing.begin(1);

        assert!(!listing.commit::<String>(first, Ok(page_of(vec!["a"], 1, 1))));
        assert!(listing.snapshot().loading);
        assert!(listing.snapshot().items.is_empty());
    }

    #[test]
    fn test_failure_resets_to_single_empty_page() {
        let listing = Listing::new();
        let ticket = listing.begin(2);
        listing.commit::<String>(ticket, Ok(page_of(vec!["x", "y"], 2, 4)));

        let ticket = listing.begin(3);
        assert!(listing.commit(ticket, Err("upstream returned 503")));

        let snapshot = listing.snapshot();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.total_pages, 1);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.last_error.as_deref(), Some("upstream returned 503"));
    }

    #[test]
    fn test_zero_total_pages_displays_one() {
        let listing = Listing::new();
        let ticket = listing.begin(1);
        listing.commit::<String>(ticket, Ok(page_of(vec![], 1, 0)));

        assert_eq!(listing.snapshot().total_pages, 1);
    }

    #[tokio::test]
    async fn test_out_of_order_resolution_shows_newest_query() {
        let listing = Arc::new(Listing::new());
        let (release_a, wait_a) = oneshot::channel::<()>();
        let (release_b, wait_b) = oneshot::channel::<()>();

        let ticket_a = listing.begin(1);
        let task_a = {
            let listing = Arc::clone(&listing);
            tokio::spawn(async move {
                wait_a.await.ok();
                listing.commit::<String>(ticket_a, Ok(page_of(vec!["query A"], 1, 1)))
            })
        };

        let ticket_b = listing.begin(1);
        let task_b = {
            let listing = Arc::clone(&listing);
            tokio::spawn(async move {
                wait_b.await.ok();
                listing.commit::<String>(ticket_b, Ok(page_of(vec!["query B"], 1, 1)))
            })
        };

        release_b.send(()).unwrap();
        assert!(task_b.await.unwrap());
        release_a.send(()).unwrap();
        assert!(!task_a.await.unwrap());

        assert_eq!(listing.snapshot().items, vec!["query B"]);
    }
}
