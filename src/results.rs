use std::ffi::OsString;
use std::time::Duration;

/// One full pass over a directory, collected.
///
/// Produced by [`DirSpec::list`](crate::DirSpec::list). Names are in native
/// listing order, not sorted.
#[derive(Debug)]
pub struct Listing {
    /// Qualifying names, in the order the platform reported them.
    pub names: Vec<OsString>,

    /// Counts for the pass.
    pub stats: ScanStats,
}

/// Counts for a cursor, so far or in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Native entries fetched, including rejected ones and the "." / ".."
    /// pseudo-entries.
    pub seen: usize,

    /// Entries that passed the filter.
    pub accepted: usize,

    /// Wall-clock time from cursor creation to exhaustion, or until now
    /// while names remain.
    pub duration: Duration,
}

impl ScanStats {
    pub(crate) fn compute(seen: usize, accepted: usize, duration: Duration) -> Self {
        Self {
            seen,
            accepted,
            duration,
        }
    }

    /// Entries fetched but not yielded.
    pub fn rejected(&self) -> usize {
        self.seen - self.accepted
    }
}
