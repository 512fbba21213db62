//! Request-ordered search session.
//!
//! Ties the aggregator to a shared [`Listing`]: each issued request takes a
//! ticket up front, so when the user moves on before a response arrives the
//! late result is dropped instead of replacing the newer one.

use std::future::Future;
use std::sync::Arc;

use cinedeck_core::{Listing, ListingSnapshot};
use tracing::{debug, warn};

use crate::aggregator::SearchAggregator;
use crate::types::SearchResultItem;

/// Search box state shared by every request it issues.
#[derive(Debug, Clone)]
pub struct SearchSession {
    aggregator: SearchAggregator,
    listing: Arc<Listing<SearchResultItem>>,
}

impl SearchSession {
    pub fn new(aggregator: SearchAggregator) -> Self {
        Self {
            aggregator,
            listing: Arc::new(Listing::new()),
        }
    }

    /// Starts a search for `(query, page)`.
    ///
    /// The ticket is taken before this returns, so issue order decides
    /// which result wins no matter when the returned future is polled.
    /// The future resolves to whether its result became visible. A failure
    /// is recorded in the listing by its error code only.
    pub fn issue(&self, query: &str, page: i64) -> impl Future<Output = bool> + Send + use<> {
        let ticket = self
            .listing
            .begin(u32::try_from(page.max(1)).unwrap_or(u32::MAX));
        let aggregator = self.aggregator.clone();
        let listing = Arc::clone(&self.listing);
        let query = query.to_string();

        async move {
            debug!(request = ticket.id(), query = %query, "Search issued");
            let outcome = match aggregator.aggregate(&query, page).await {
                Ok(state) => Ok(state.into_page()),
                Err(err) => {
                    warn!(request = ticket.id(), query = %query, error = %err, "Search failed");
                    Err(err.code())
                }
            };
            listing.commit(ticket, outcome)
        }
    }

    /// Runs a search to completion.
    pub async fn search(&self, query: &str, page: i64) -> bool {
        self.issue(query, page).await
    }

    pub fn snapshot(&self) -> ListingSnapshot<SearchResultItem> {
        self.listing.snapshot()
    }

    pub fn listing(&self) -> Arc<Listing<SearchResultItem>> {
        Arc::clone(&self.listing)
    }
}
