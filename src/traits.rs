use std::ffi::OsStr;
use std::path::Path;

use crate::entry::RawEntry;
use crate::error::DirError;

/// A native directory search, opened over one directory.
///
/// Implement this to list anything that hands out (kind, name) pairs one at
/// a time. The crate ships one implementation per target as
/// [`PlatformWalker`](crate::PlatformWalker): a `DIR*` stream on Unix and a
/// `FindFirstFileW` search handle on Windows.
///
/// # Resource contract
///
/// A value of the implementing type *is* an open handle. `open` either
/// returns one or an error, never a half-opened value. [`close`](Walker::close)
/// takes `self`, so a walker cannot be closed twice or used after closing.
/// Dropping a walker without calling `close` must release the handle as well;
/// the cursor relies on this when a filter panics mid-advance.
///
/// # Example
///
/// ```rust
/// use std::collections::VecDeque;
/// use std::path::Path;
/// use dircursor::{DirError, EntryKind, RawEntry, Walker};
///
/// struct Fixed(VecDeque<RawEntry>);
///
/// impl Walker for Fixed {
///     fn open(_path: &Path) -> Result<Self, DirError> {
///         Ok(Fixed(VecDeque::from(vec![
///             RawEntry::new(EntryKind::File, "a.txt"),
///             RawEntry::new(EntryKind::Dir, "sub"),
///         ])))
///     }
///
///     fn fetch_next(&mut self) -> Option<RawEntry> {
///         self.0.pop_front()
///     }
/// }
///
/// let spec = dircursor::dir("anywhere").files_only(true);
/// let names: Vec<_> = spec.cursor_with::<Fixed>().collect();
/// assert_eq!(names, ["a.txt"]);
/// ```
pub trait Walker: Sized {
    /// Begin a search over `path`.
    ///
    /// Failing here is not fatal to callers: the lenient cursor treats it
    /// exactly like an empty directory.
    fn open(path: &Path) -> Result<Self, DirError>;

    /// The next native entry, unfiltered. `None` once the listing is done.
    ///
    /// Platform errors mid-listing also end the listing; they are not
    /// retried.
    fn fetch_next(&mut self) -> Option<RawEntry>;

    /// Release the native handle.
    fn close(self) {
        drop(self);
    }
}

/// Decides whether a name qualifies for output.
///
/// Implemented for every `Fn(&OsStr) -> bool`, so closures work directly:
///
/// ```rust
/// use std::ffi::OsStr;
/// use dircursor::NameFilter;
///
/// let starts_with_a = |name: &OsStr| name.as_encoded_bytes().starts_with(b"a");
/// assert!(starts_with_a.is_match(OsStr::new("alpha")));
/// assert!(!starts_with_a.is_match(OsStr::new("beta")));
/// ```
///
/// # Thread Safety
///
/// `Send + Sync` are required so a [`DirSpec`](crate::DirSpec) can be shared
/// and listed from several threads, each with its own cursor.
pub trait NameFilter: Send + Sync {
    /// Returns `true` if an entry with this name should be yielded.
    fn is_match(&self, name: &OsStr) -> bool;
}

impl<F> NameFilter for F
where
    F: Fn(&OsStr) -> bool + Send + Sync,
{
    fn is_match(&self, name: &OsStr) -> bool {
        self(name)
    }
}
