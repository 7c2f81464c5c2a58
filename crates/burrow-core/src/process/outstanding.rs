use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Count of URLs accepted into the queue but not yet terminally processed.
///
/// The increment happens before an item becomes visible to any consumer,
/// and the decrement after the owning worker has completed all descendant
/// offers for that item. That ordering is what makes the zero transition a
/// correct termination predicate; decrementing on dequeue instead would
/// shut the crawl down while descendants were still being produced.
#[derive(Default)]
pub(crate) struct Outstanding {
    count: AtomicUsize,
    notify: Notify,
}

impl Outstanding {
    /// Creates a new [`Outstanding`] counter at zero.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records one accepted URL.
    pub(crate) fn add(&self) {
        let _ = self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Records the terminal processing of one URL.
    pub(crate) fn done(&self) {
        let previous = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "outstanding counter underflow");
        if previous == 1 {
            self.notify.notify_waiters();
        }
    }

    /// Resolves once the counter reaches zero.
    pub(crate) async fn wait_idle(&self) {
        loop {
            let notified = self.notify.notified();
            if self.count.load(Ordering::Acquire) == 0 {
                return;
            }

            notified.await;
        }
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Outstanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.count.load(Ordering::Acquire);
        f.debug_struct("Outstanding").field("count", &count).finish()
    }
}
