use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

/// Monotonic set of URLs that have ever been offered to the work queue.
///
/// Entries are added and never removed during a run. The single exposed
/// operation combines the membership test and the insert into one atomic
/// step: a two-step check-then-insert would let two workers both see a URL
/// absent and enqueue it twice.
///
/// The set is unbounded. Crawls are single-origin, so memory is bounded by
/// the host's own link graph; a multi-host extension would swap this for a
/// bloom filter or an LRU.
#[must_use]
#[derive(Default)]
pub struct SeenSet {
    inner: Mutex<HashSet<String>>,
}

impl SeenSet {
    /// Creates an empty [`SeenSet`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically tests membership and inserts if absent.
    ///
    /// Returns `true` when `url` was seen for the first time.
    pub fn insert(&self, url: &str) -> bool {
        let guard = self.inner.lock();
        let mut lock = guard.expect("should not be already held");
        if lock.contains(url) {
            return false;
        }
        lock.insert(url.to_owned())
    }

    /// Returns the number of distinct URLs ever offered.
    #[must_use]
    pub fn len(&self) -> usize {
        let guard = self.inner.lock();
        let lock = guard.expect("should not be already held");
        lock.len()
    }

    /// Returns `true` if no URL has been offered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SeenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeenSet").field("len", &self.len()).finish()
    }
}
