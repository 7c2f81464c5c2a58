//! The public entry point for running crawls.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::extract::Extractor;
use crate::fetch::Fetcher;
use crate::report::Reporter;

use super::runner::Runner;

/// Default maximum number of pending URLs.
const DEFAULT_QUEUE_LENGTH: usize = 1000;

/// Default number of concurrent workers.
const DEFAULT_WORKERS: usize = 5;

/// Default per-URL deadline.
const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates a single-origin crawl over consumer-supplied collaborators.
///
/// A `Crawler` binds a [`Fetcher`], an [`Extractor`], and a [`Reporter`] to
/// the engine: a bounded work queue, a monotonic dedup set, and a fixed
/// pool of workers. Each [`Crawler::run`] call gets a fresh queue and
/// dedup set, crawls from the seed until the reachable set is exhausted,
/// and reports every lifecycle event to the reporter.
///
/// # Examples
///
/// ```no_run
/// use burrow_core::Crawler;
/// use burrow_core::report::Noop;
/// use burrow_core::testing::{MockExtractor, MockFetcher, MockPage};
///
/// # async fn example() {
/// let fetcher = MockFetcher::new().page("https://a.example", MockPage::html("body"));
/// let crawler = Crawler::new(fetcher, MockExtractor::new(), Noop)
///     .with_workers(2)
///     .with_queue_length(64);
///
/// let processed = crawler.run("https://a.example").await;
/// # }
/// ```
#[must_use]
pub struct Crawler<F, X, R> {
    fetcher: Arc<F>,
    extractor: Arc<X>,
    reporter: Arc<R>,

    cancel: CancellationToken,
    queue_length: usize,
    workers: usize,
    item_timeout: Duration,
}

impl<F, X, R> Crawler<F, X, R>
where
    F: Fetcher,
    X: Extractor,
    R: Reporter,
{
    /// Creates a new [`Crawler`] with the default configuration: a queue of
    /// 1000 pending URLs, 5 workers, and a 10 second per-URL deadline.
    pub fn new(fetcher: F, extractor: X, reporter: R) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            reporter: Arc::new(reporter),
            cancel: CancellationToken::new(),
            queue_length: DEFAULT_QUEUE_LENGTH,
            workers: DEFAULT_WORKERS,
            item_timeout: DEFAULT_ITEM_TIMEOUT,
        }
    }

    /// Sets the maximum number of pending URLs. The minimum value is 1.
    ///
    /// URLs offered while the queue is at capacity are dropped and reported
    /// with a `queue full` error against the dropped child.
    pub fn with_queue_length(mut self, length: usize) -> Self {
        self.queue_length = length.max(1);
        self
    }

    /// Sets the number of concurrent workers. The minimum value is 1.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the per-URL deadline.
    ///
    /// A URL that exceeds it is reported as canceled, indistinguishably
    /// from an external cancellation.
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }

    /// Returns the external cancellation scope for this crawler.
    ///
    /// Cancelling it makes in-flight pipelines terminate at their next
    /// suspension point and [`Crawler::run`] return once they have drained.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use burrow_core::Crawler;
    /// # use burrow_core::report::Noop;
    /// # use burrow_core::testing::{MockExtractor, MockFetcher};
    /// # async fn example() {
    /// let crawler = Crawler::new(MockFetcher::new(), MockExtractor::new(), Noop);
    /// let cancel = crawler.cancellation_token();
    ///
    /// tokio::spawn(async move {
    ///     tokio::signal::ctrl_c().await.ok();
    ///     cancel.cancel();
    /// });
    ///
    /// crawler.run("https://a.example").await;
    /// # }
    /// ```
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls from `seed` until every reachable and enqueueable URL has
    /// been terminally reported. Returns the number of processed URLs.
    ///
    /// # Panics
    ///
    /// Panics if the seed is rejected by the freshly constructed dedup set
    /// or queue; that indicates a programming error, not an input error.
    pub async fn run(&self, seed: impl Into<String>) -> usize {
        let runner = Arc::new(Runner::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.extractor),
            Arc::clone(&self.reporter),
            self.cancel.clone(),
            self.queue_length,
            self.workers,
            self.item_timeout,
        ));

        runner.run(seed.into()).await
    }
}

impl<F, X, R> fmt::Debug for Crawler<F, X, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crawler")
            .field("queue_length", &self.queue_length)
            .field("workers", &self.workers)
            .field("item_timeout", &self.item_timeout)
            .finish_non_exhaustive()
    }
}
