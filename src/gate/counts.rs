//! Per-route admission counters.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::gate::key::RouteKey;

/// Result of a single admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request was counted. `count` includes it.
    Admitted { count: u64 },
    /// The ceiling was already reached. The counter was left untouched.
    Rejected { count: u64 },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// Admitted-request counts, keyed by [`RouteKey`].
///
/// Entries are created on first admission and never removed. The
/// check-then-increment in [`RequestCounts::try_admit`] runs under the shard
/// lock of the key, so concurrent callers can not push a key past the ceiling.
#[derive(Debug, Default)]
pub struct RequestCounts {
    inner: DashMap<RouteKey, u64>,
}

impl RequestCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request for `key` unless it already reached `ceiling`.
    pub fn try_admit(&self, key: RouteKey, ceiling: u64) -> Admission {
        match self.inner.entry(key) {
            Entry::Occupied(mut entry) => {
                let count = entry.get_mut();
                if *count >= ceiling {
                    Admission::Rejected { count: *count }
                } else {
                    *count += 1;
                    Admission::Admitted { count: *count }
                }
            }
            // Absent counts as zero; only materialize the entry on admission.
            Entry::Vacant(entry) => {
                if ceiling == 0 {
                    Admission::Rejected { count: 0 }
                } else {
                    entry.insert(1);
                    Admission::Admitted { count: 1 }
                }
            }
        }
    }

    /// Current count for `key`, 0 if it was never admitted.
    pub fn get(&self, key: &RouteKey) -> u64 {
        self.inner.get(key).map(|count| *count).unwrap_or(0)
    }

    /// Number of distinct keys with at least one admission.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
