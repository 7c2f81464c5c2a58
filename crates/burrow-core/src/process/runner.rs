//! Internal runner that drives the crawl to quiescence.
//!
//! The [`Runner`] owns the queue, the dedup set, and the outstanding
//! counter for the duration of one run. Workers share it behind an [`Arc`]
//! and funnel every per-URL outcome into the reporter; nothing here returns
//! an error, because per-URL failures are observations, not faults.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::time;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "tracing")]
use crate::TRACING_TARGET_CRAWLER as CRAWLER;
#[cfg(feature = "tracing")]
use crate::TRACING_TARGET_WORKER as WORKER;
use crate::extract::{Extracted, Extractor};
use crate::fetch::Fetcher;
use crate::queue::{Offer, WorkQueue};
use crate::report::Reporter;
use crate::{ErrorKind, SeenSet};

use super::outstanding::Outstanding;

/// Per-run state shared by the orchestrator and its workers.
pub(crate) struct Runner<F, X, R> {
    fetcher: Arc<F>,
    extractor: Arc<X>,
    reporter: Arc<R>,

    queue: WorkQueue,
    seen: SeenSet,
    outstanding: Outstanding,
    processed: AtomicUsize,

    cancel: CancellationToken,
    workers: usize,
    item_timeout: Duration,
}

impl<F, X, R> Runner<F, X, R>
where
    F: Fetcher,
    X: Extractor,
    R: Reporter,
{
    /// Creates a [`Runner`] with a fresh queue, dedup set, and counter.
    pub(crate) fn new(
        fetcher: Arc<F>,
        extractor: Arc<X>,
        reporter: Arc<R>,
        cancel: CancellationToken,
        queue_length: usize,
        workers: usize,
        item_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            reporter,
            queue: WorkQueue::new(queue_length),
            seen: SeenSet::new(),
            outstanding: Outstanding::new(),
            processed: AtomicUsize::new(0),
            cancel,
            workers,
            item_timeout,
        }
    }

    /// Crawls from `seed` until the reachable set is exhausted or the
    /// external scope fires. Returns the number of terminally processed
    /// URLs.
    ///
    /// # Panics
    ///
    /// Panics if the seed is rejected by the dedup set or the queue. Both
    /// are fresh at this point, so a rejection is a programming error.
    pub(crate) async fn run(self: &Arc<Self>, seed: String) -> usize {
        self.reporter.init();

        #[cfg(feature = "tracing")]
        tracing::info!(target: CRAWLER, %seed, workers = self.workers, "starting crawl");

        assert!(
            self.seen.insert(&seed),
            "seed rejected by a fresh dedup set"
        );
        self.outstanding.add();
        match self.queue.offer(seed.clone()) {
            Offer::Accepted => self.reporter.queued(&seed),
            Offer::Full => panic!("seed rejected by an empty queue"),
        }

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let runner = Arc::clone(self);
                tokio::spawn(async move { runner.work(id).await })
            })
            .collect();

        self.outstanding.wait_idle().await;
        self.queue.close();
        for handle in handles {
            let _ = handle.await;
        }

        let total = self.processed.load(Ordering::Acquire);

        #[cfg(feature = "tracing")]
        tracing::info!(target: CRAWLER, total, "crawl finished");

        self.reporter.exit();
        total
    }

    /// Worker loop: take, process, decrement; exit when the queue closes.
    async fn work(&self, id: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: WORKER, id, "worker started");
        #[cfg(not(feature = "tracing"))]
        let _ = id;

        while let Some(url) = self.queue.take().await {
            self.process(&url).await;
            let _ = self.processed.fetch_add(1, Ordering::AcqRel);
            self.outstanding.done();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(target: WORKER, id, "worker stopped");
    }

    /// Runs the per-URL pipeline under the per-item deadline.
    async fn process(&self, url: &str) {
        // A URL dequeued after external cancellation is terminally reported
        // without ever starting.
        if self.cancel.is_cancelled() {
            self.reporter.error(url, ErrorKind::Canceled);
            return;
        }

        let scope = self.cancel.child_token();
        let pipeline = self.pipeline(&scope, url);
        if time::timeout(self.item_timeout, pipeline).await.is_err() {
            // Dropping the pipeline future released the body stream.
            scope.cancel();
            self.reporter.error(url, ErrorKind::Canceled);

            #[cfg(feature = "tracing")]
            tracing::debug!(target: WORKER, %url, "item deadline elapsed");
        }
    }

    /// The per-URL pipeline: fetch, check, extract, report, enqueue.
    async fn pipeline(&self, scope: &CancellationToken, url: &str) {
        self.reporter.starting(url);
        let started = Instant::now();

        let fetched = tokio::select! {
            () = scope.cancelled() => {
                self.reporter.error(url, ErrorKind::Canceled);
                return;
            }
            result = self.fetcher.fetch(scope, url) => result,
        };

        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(target: WORKER, %url, %error, "fetch failed");

                let kind = if error.is_canceled() {
                    ErrorKind::Canceled
                } else {
                    ErrorKind::Transport
                };
                self.reporter.error(url, kind);
                return;
            }
        };

        // Non-200 is a terminal observation, not an error.
        if fetched.status != http::StatusCode::OK {
            self.reporter
                .finished(url, fetched.status, started.elapsed(), 0, 0);
            return;
        }

        if !fetched.html {
            self.reporter.error(url, ErrorKind::NotHtml);
            return;
        }

        let Extracted { links, errors } = self
            .extractor
            .extract(scope, url, fetched.body)
            .await;

        // The extractor may have ended early because the scope fired.
        if scope.is_cancelled() {
            self.reporter.error(url, ErrorKind::Canceled);
            return;
        }

        self.reporter
            .finished(url, fetched.status, started.elapsed(), links.len(), errors.len());

        for link in links {
            self.enqueue(&link);
        }
    }

    /// Offers a child URL through the dedup set and then the queue.
    ///
    /// Rejections are reported against the child, never the parent. A URL
    /// rejected by the dedup set never touches the queue or the counter.
    fn enqueue(&self, url: &str) {
        if !self.seen.insert(url) {
            self.reporter.error(url, ErrorKind::Duplicate);
            return;
        }

        // Incrementing before the offer keeps the counter visible-before-
        // item; the caller still holds the parent's count, so undoing the
        // increment on a full queue cannot reach zero early.
        self.outstanding.add();
        match self.queue.offer(url) {
            Offer::Accepted => self.reporter.queued(url),
            Offer::Full => {
                self.outstanding.done();
                self.reporter.error(url, ErrorKind::QueueFull);
            }
        }
    }
}
