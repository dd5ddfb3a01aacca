use std::ffi::{OsStr, OsString};
use std::iter::FusedIterator;
use std::mem;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::builder::DirSpec;
use crate::error::DirError;
use crate::results::ScanStats;
use crate::sys::PlatformWalker;
use crate::traits::Walker;

// ---------------------------------------------------------------------------
// Cursor state
// ---------------------------------------------------------------------------

/// Where a cursor stands. A walker only ever lives inside `Ready`, next to
/// the name it has already found, so an open handle with no decided next
/// entry cannot be represented.
enum CursorState<W> {
    /// The directory never opened; no handle was acquired.
    Failed(DirError),

    /// `name` qualifies and has not been handed out yet.
    Ready { walker: W, name: OsString },

    /// Listing finished and the handle is closed. Absorbing.
    Exhausted,
}

// ---------------------------------------------------------------------------
// DirCursor
// ---------------------------------------------------------------------------

/// A single-pass, pull-based listing of one directory.
///
/// The directory is opened when the cursor is created and the first
/// qualifying name is located right away. Each [`pull`](DirCursor::pull)
/// hands out that name and looks for the next one.
///
/// The native handle is closed exactly once: as soon as the listing runs
/// out, or when the cursor is dropped early, whichever happens first. A
/// cursor whose directory failed to open holds no handle and yields
/// nothing.
///
/// Not meant to be shared between threads; create one cursor per consumer.
pub struct DirCursor<'s, W: Walker = PlatformWalker> {
    spec:     &'s DirSpec,
    state:    CursorState<W>,
    seen:     usize,
    accepted: usize,
    started:  Instant,
    finished: Option<Duration>,
}

impl<'s, W: Walker> DirCursor<'s, W> {
    /// Build a cursor from the outcome of [`Walker::open`].
    ///
    /// An `Err` produces an exhausted cursor; the error stays available
    /// through [`open_error`](DirCursor::open_error).
    pub fn from_walker(spec: &'s DirSpec, opened: Result<W, DirError>) -> Self {
        let mut cursor = Self {
            spec,
            state:    CursorState::Exhausted,
            seen:     0,
            accepted: 0,
            started:  Instant::now(),
            finished: None,
        };
        cursor.state = match opened {
            Ok(walker) => {
                trace!(path = %spec.path().display(), "directory opened");
                cursor.advance(walker)
            }
            Err(err) => {
                debug!(path = %spec.path().display(), error = %err, "directory not listable, treating as empty");
                cursor.finished = Some(cursor.started.elapsed());
                CursorState::Failed(err)
            }
        };
        cursor
    }

    pub(crate) fn try_from_walker(spec: &'s DirSpec, opened: Result<W, DirError>) -> Result<Self, DirError> {
        let walker = opened?;
        Ok(Self::from_walker(spec, Ok(walker)))
    }

    /// Search forward for the next qualifying entry.
    ///
    /// Takes the walker by value: it either comes back inside `Ready` or is
    /// closed here. If the filter panics the walker is dropped during
    /// unwinding, which releases it as well.
    fn advance(&mut self, mut walker: W) -> CursorState<W> {
        while let Some(entry) = walker.fetch_next() {
            self.seen += 1;
            if self.spec.accepts(&entry) {
                self.accepted += 1;
                return CursorState::Ready { walker, name: entry.name };
            }
        }
        walker.close();
        self.finished = Some(self.started.elapsed());
        trace!(
            path     = %self.spec.path().display(),
            seen     = self.seen,
            accepted = self.accepted,
            "directory exhausted, handle closed"
        );
        CursorState::Exhausted
    }

    /// Take the current name and move on to the next one.
    ///
    /// Returns `None` once the listing is exhausted, and on every call
    /// after that.
    pub fn pull(&mut self) -> Option<OsString> {
        match mem::replace(&mut self.state, CursorState::Exhausted) {
            CursorState::Ready { walker, name } => {
                self.state = self.advance(walker);
                Some(name)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The name the next [`pull`](DirCursor::pull) will return.
    pub fn peek(&self) -> Option<&OsStr> {
        match &self.state {
            CursorState::Ready { name, .. } => Some(name.as_os_str()),
            _ => None,
        }
    }

    /// `true` once no name remains. The handle is already closed by then.
    pub fn is_exhausted(&self) -> bool {
        !matches!(self.state, CursorState::Ready { .. })
    }

    /// Why the directory could not be opened, if it couldn't.
    pub fn open_error(&self) -> Option<&DirError> {
        match &self.state {
            CursorState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Counts so far. The duration runs from creation to exhaustion, and
    /// stops growing once the listing is done.
    pub fn stats(&self) -> ScanStats {
        let duration = self.finished.unwrap_or_else(|| self.started.elapsed());
        ScanStats::compute(self.seen, self.accepted, duration)
    }

    /// Pull to the end, handing each name to `f`, until `f` fails.
    ///
    /// Consumes the cursor, so the handle is released before an error from
    /// `f` reaches the caller, and during unwinding if `f` panics.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn consume<F, E>(mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&OsStr) -> Result<(), E>,
    {
        while let Some(name) = self.pull() {
            if let Err(err) = f(&name) {
                drop(self);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Stop listing and release the handle now. Same as dropping the cursor.
    pub fn close(self) {
        drop(self);
    }
}

impl<W: Walker> Drop for DirCursor<'_, W> {
    fn drop(&mut self) {
        if let CursorState::Ready { walker, .. } = mem::replace(&mut self.state, CursorState::Exhausted) {
            walker.close();
            trace!(
                path     = %self.spec.path().display(),
                accepted = self.accepted,
                "cursor dropped early, handle closed"
            );
        }
    }
}

impl<W: Walker> Iterator for DirCursor<'_, W> {
    type Item = OsString;

    fn next(&mut self) -> Option<OsString> {
        self.pull()
    }
}

impl<W: Walker> FusedIterator for DirCursor<'_, W> {}

impl<W: Walker> std::fmt::Debug for DirCursor<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirCursor")
            .field("path", &self.spec.path())
            .field("current", &self.peek())
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}
