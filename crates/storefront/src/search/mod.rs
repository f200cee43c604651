//! Debounced catalog search.
//!
//! Keystrokes arrive faster than the backend should be queried. The
//! [`SearchDebouncer`] holds at most one scheduled query: each new input
//! aborts the pending timer and starts a new one, so a query only goes out
//! once the input has been quiet for the debounce period.
//!
//! Queries that have already been sent are not cancelled. Instead every
//! scheduled query carries a sequence number and its results are published
//! only if no newer query's results have been published yet, so a slow
//! response can never overwrite a fresher one.
//!
//! Outcomes are published on a `tokio::sync::watch` channel. A failed
//! query publishes an empty product list together with the message to
//! show, so subscribers always learn that the query finished.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use qkart_core::Product;

use crate::client::StorefrontClient;
use crate::error::{Operation, Result};

/// Something that can answer a search query.
///
/// Implemented by [`StorefrontClient`] and by any
/// `Fn(String) -> impl Future<Output = Result<Vec<Product>>>`.
pub trait SearchSource: Send + Sync + 'static {
    /// Products matching `query`.
    fn search(&self, query: String) -> impl Future<Output = Result<Vec<Product>>> + Send;
}

impl SearchSource for StorefrontClient {
    fn search(&self, query: String) -> impl Future<Output = Result<Vec<Product>>> + Send {
        let client = self.clone();
        async move { client.fetch_filtered_products(&query).await }
    }
}

impl<F, Fut> SearchSource for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Product>>> + Send,
{
    fn search(&self, query: String) -> impl Future<Output = Result<Vec<Product>>> + Send {
        self(query)
    }
}

/// Latest published search outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Sequence number of the query these results answer (0 = none yet).
    pub seq: u64,
    /// Query text.
    pub query: String,
    /// Matching products; empty when the query failed.
    pub products: Vec<Product>,
    /// User-facing message if the query failed.
    pub error: Option<String>,
}

impl SearchResults {
    /// Whether the query failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Coalesces rapid input into a single delayed search.
pub struct SearchDebouncer<S> {
    source: Arc<S>,
    delay: Duration,
    next_seq: u64,
    pending: Option<JoinHandle<()>>,
    results: Arc<watch::Sender<SearchResults>>,
}

impl<S: SearchSource> SearchDebouncer<S> {
    /// Create a debouncer that queries `source` after `delay` of quiet.
    #[must_use]
    pub fn new(source: S, delay: Duration) -> Self {
        let (results, _) = watch::channel(SearchResults::default());

        Self {
            source: Arc::new(source),
            delay,
            next_seq: 0,
            pending: None,
            results: Arc::new(results),
        }
    }

    /// Subscribe to published results.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.results.subscribe()
    }

    /// Snapshot of the most recently published results.
    #[must_use]
    pub fn latest(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Handle new input text.
    ///
    /// Cancels the pending query, if any, and schedules `text` to be
    /// searched after the quiet period. Returns the sequence number
    /// assigned to the new query.
    ///
    /// Must be called within a Tokio runtime.
    pub fn on_input(&mut self, text: impl Into<String>) -> u64 {
        self.cancel();

        self.next_seq += 1;
        let seq = self.next_seq;
        let query = text.into();
        let source = Arc::clone(&self.source);
        let results = Arc::clone(&self.results);
        let delay = self.delay;

        debug!(seq, query = %query, "Scheduling search");

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so that aborting this timer never aborts a sent query
            tokio::spawn(run_query(source, results, seq, query));
        }));

        seq
    }

    /// Cancel the pending query. Returns `true` if one was scheduled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|handle| {
            let was_waiting = !handle.is_finished();
            handle.abort();
            was_waiting
        })
    }

    /// Whether a query is still waiting for its quiet period to elapse.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<S> Drop for SearchDebouncer<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

async fn run_query<S: SearchSource>(
    source: Arc<S>,
    results: Arc<watch::Sender<SearchResults>>,
    seq: u64,
    query: String,
) {
    let outcome = match source.search(query.clone()).await {
        Ok(products) => SearchResults {
            seq,
            query: query.clone(),
            products,
            error: None,
        },
        Err(e) => {
            warn!(seq, query = %query, error = %e, "Search failed");
            SearchResults {
                seq,
                query: query.clone(),
                products: Vec::new(),
                error: Some(e.user_message(Operation::SearchProducts)),
            }
        }
    };
    let count = outcome.products.len();

    let applied = results.send_if_modified(|current| {
        if seq <= current.seq {
            return false;
        }
        *current = outcome;
        true
    });

    if applied {
        debug!(seq, query = %query, count, "Published search outcome");
    } else {
        warn!(seq, query = %query, "Discarded stale search outcome");
    }
}
