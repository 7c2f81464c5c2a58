//! Bounded FIFO work queue shared by the orchestrator and the worker pool.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use tokio::sync::Notify;

/// Outcome of a non-blocking [`WorkQueue::offer`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// The URL was enqueued and will be delivered to exactly one worker.
    Accepted,

    /// The queue was at capacity; the URL was dropped.
    Full,
}

/// Fixed-capacity FIFO queue of pending URLs.
///
/// `offer` is deliberately non-blocking: a worker enqueueing its own
/// descendants while being the only consumer able to drain the queue would
/// otherwise deadlock. When the queue is at capacity the offer returns
/// [`Offer::Full`] and the URL is dropped; that loss of completeness is the
/// chosen backpressure policy, and operators tune the capacity.
///
/// Items are delivered in the order they were accepted, modulo the
/// interleaving of concurrent takers. After [`WorkQueue::close`], in-flight
/// items are still delivered before [`WorkQueue::take`] starts returning
/// `None`.
#[must_use]
pub struct WorkQueue {
    inner: Mutex<WorkQueueInner>,
    notify: Notify,
}

struct WorkQueueInner {
    items: VecDeque<String>,
    capacity: usize,
    closed: bool,
}

impl WorkQueue {
    /// Creates a new [`WorkQueue`] holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        Self {
            inner: Mutex::new(WorkQueueInner {
                items: VecDeque::with_capacity(capacity),
                capacity,
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Attempts to enqueue a URL without blocking.
    ///
    /// Returns [`Offer::Full`] if the queue already holds its maximum
    /// number of items, or if it has been closed.
    pub fn offer(&self, url: impl Into<String>) -> Offer {
        let guard = self.inner.lock();
        let mut lock = guard.expect("should not be already held");
        if lock.closed || lock.items.len() >= lock.capacity {
            return Offer::Full;
        }

        lock.items.push_back(url.into());
        drop(lock);

        self.notify.notify_one();
        Offer::Accepted
    }

    /// Removes the oldest pending URL, waiting for one to arrive.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn take(&self) -> Option<String> {
        loop {
            let notified = self.notify.notified();

            {
                let guard = self.inner.lock();
                let mut lock = guard.expect("should not be already held");
                if let Some(url) = lock.items.pop_front() {
                    return Some(url);
                }

                if lock.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Signals consumers that no more items will arrive.
    pub fn close(&self) {
        {
            let guard = self.inner.lock();
            let mut lock = guard.expect("should not be already held");
            lock.closed = true;
        }

        self.notify.notify_waiters();
    }

    /// Returns the number of pending items.
    #[must_use]
    pub fn len(&self) -> usize {
        let guard = self.inner.lock();
        let lock = guard.expect("should not be already held");
        lock.items.len()
    }

    /// Returns `true` if no items are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for WorkQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkQueue").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use super::{Offer, WorkQueue};

    #[tokio::test]
    async fn fifo_order() {
        let queue = WorkQueue::new(10);
        assert_eq!(queue.offer("a"), Offer::Accepted);
        assert_eq!(queue.offer("b"), Offer::Accepted);

        assert_eq!(queue.take().await.as_deref(), Some("a"));
        assert_eq!(queue.take().await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn full_at_capacity() {
        let queue = WorkQueue::new(2);
        assert_eq!(queue.offer("a"), Offer::Accepted);
        assert_eq!(queue.offer("b"), Offer::Accepted);
        assert_eq!(queue.offer("c"), Offer::Full);
        assert_eq!(queue.len(), 2);

        let _ = queue.take().await;
        assert_eq!(queue.offer("c"), Offer::Accepted);
    }

    #[tokio::test]
    async fn close_delivers_in_flight() {
        let queue = WorkQueue::new(10);
        let _ = queue.offer("a");
        queue.close();

        assert_eq!(queue.take().await.as_deref(), Some("a"));
        assert_eq!(queue.take().await, None);
        assert_eq!(queue.take().await, None);
    }

    #[tokio::test]
    async fn offer_after_close() {
        let queue = WorkQueue::new(10);
        queue.close();
        assert_eq!(queue.offer("a"), Offer::Full);
    }

    #[tokio::test]
    async fn take_blocks_until_offer() {
        let queue = Arc::new(WorkQueue::new(10));

        let producer = queue.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            producer.offer("late")
        });

        assert_eq!(queue.take().await.as_deref(), Some("late"));
        assert_eq!(handle.await.unwrap(), Offer::Accepted);
    }

    #[tokio::test]
    async fn close_wakes_blocked_takers() {
        let queue = Arc::new(WorkQueue::new(10));

        let consumer = queue.clone();
        let handle = tokio::spawn(async move { consumer.take().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();
        assert_eq!(handle.await.unwrap(), None);
    }
}
