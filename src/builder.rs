use std::convert::Infallible;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::engine::DirCursor;
use crate::entry::RawEntry;
use crate::error::DirError;
use crate::filter::{self, ExtensionMatcher, GlobMatcher, Predicate, SubstringMatcher};
use crate::results::Listing;
use crate::sys::PlatformWalker;
use crate::traits::{NameFilter, Walker};

// ---------------------------------------------------------------------------
// DirSpec
// ---------------------------------------------------------------------------

/// What to list: a directory, whether to keep regular files only, and an
/// optional name predicate.
///
/// Created via [`dircursor::dir()`](crate::dir) or [`DirSpec::new`].
/// Configure with chained builder methods, then either pull names from a
/// [`cursor()`](DirSpec::cursor) or push them into a callback with
/// [`for_each()`](DirSpec::for_each).
///
/// A spec is never modified by listing it. Every cursor borrows it for one
/// pass, and any number of independent cursors may exist at once.
///
/// # Example
///
/// ```rust,no_run
/// let spec = dircursor::dir("testdir")
///     .files_only(true)
///     .matching(".txt");
///
/// for name in &spec {
///     println!("{}", name.to_string_lossy());
/// }
/// ```
pub struct DirSpec {
    path:       PathBuf,
    files_only: bool,
    filter:     Option<Predicate>,
}

impl DirSpec {
    /// A spec listing every file and directory in `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:       path.into(),
            files_only: false,
            filter:     None,
        }
    }

    // ── Filtering ─────────────────────────────────────────────────────────

    /// Keep regular files only; directories are skipped.
    pub fn files_only(mut self, yes: bool) -> Self {
        self.files_only = yes;
        self
    }

    /// Set a custom name predicate, replacing any previous one.
    ///
    /// Any [`NameFilter`] is accepted, including plain closures over
    /// `&OsStr`.
    pub fn filter(mut self, f: impl NameFilter + 'static) -> Self {
        self.filter = Some(Predicate::Name(Box::new(f)));
        self
    }

    /// Shorthand for a case-insensitive substring predicate.
    pub fn matching(self, pattern: impl AsRef<str>) -> Self {
        self.filter(SubstringMatcher::new(pattern.as_ref()))
    }

    /// Shorthand for an extension predicate. A leading dot is optional and
    /// comparison ignores ASCII case.
    pub fn extension(self, ext: impl AsRef<str>) -> Self {
        self.filter(ExtensionMatcher::new(ext.as_ref()))
    }

    /// Gitignore-style glob predicate, replacing any previous predicate.
    ///
    /// Prefix a glob with `!` to exclude; end it with `/` to match
    /// directories only.
    ///
    /// # Errors
    ///
    /// Returns [`DirError::InvalidPattern`] if any glob fails to compile.
    pub fn glob<I, S>(mut self, patterns: I) -> Result<Self, DirError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = Some(Predicate::Glob(GlobMatcher::new(patterns)?));
        Ok(self)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The directory this spec lists.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether directories are skipped.
    pub fn is_files_only(&self) -> bool {
        self.files_only
    }

    /// Whether a name predicate or glob is set.
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Run the entry filter on one raw entry.
    ///
    /// Pseudo-entries and other non-candidate kinds are always rejected.
    pub fn accepts(&self, entry: &RawEntry) -> bool {
        entry.is_candidate() && filter::accepts(entry, self.files_only, self.filter.as_ref())
    }

    // ── Pull ──────────────────────────────────────────────────────────────

    /// Open the directory and position a cursor on the first qualifying name.
    ///
    /// A directory that cannot be opened yields an exhausted cursor, exactly
    /// as an empty directory would. Use [`try_cursor`](DirSpec::try_cursor)
    /// to see why.
    pub fn cursor(&self) -> DirCursor<'_> {
        self.cursor_with::<PlatformWalker>()
    }

    /// Like [`cursor`](DirSpec::cursor), but reports a failed open.
    ///
    /// # Errors
    ///
    /// Returns the classified open failure (not found, permission denied,
    /// not a directory, other I/O).
    pub fn try_cursor(&self) -> Result<DirCursor<'_>, DirError> {
        DirCursor::try_from_walker(self, PlatformWalker::open(&self.path))
    }

    /// Open a cursor over a custom [`Walker`].
    pub fn cursor_with<W: Walker>(&self) -> DirCursor<'_, W> {
        DirCursor::from_walker(self, W::open(&self.path))
    }

    // ── Push ──────────────────────────────────────────────────────────────

    /// Call `f` with every qualifying name, in native listing order.
    ///
    /// The directory handle is released before this returns, and also if
    /// `f` panics.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&OsStr),
    {
        match self.try_for_each(|name| {
            f(name);
            Ok::<(), Infallible>(())
        }) {
            Ok(())     => {}
            Err(never) => match never {},
        }
    }

    /// Call `f` with every qualifying name until it returns an error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`. The directory handle has
    /// already been released by the time the caller sees it.
    pub fn try_for_each<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&OsStr) -> Result<(), E>,
    {
        self.cursor().consume(f)
    }

    /// Collect one full pass into a [`Listing`].
    pub fn list(&self) -> Listing {
        let mut cursor = self.cursor();
        let mut names  = Vec::<OsString>::new();
        while let Some(name) = cursor.pull() {
            names.push(name);
        }
        Listing {
            names,
            stats: cursor.stats(),
        }
    }
}

impl<'s> IntoIterator for &'s DirSpec {
    type Item     = OsString;
    type IntoIter = DirCursor<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursor()
    }
}

impl std::fmt::Debug for DirSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirSpec")
            .field("path", &self.path)
            .field("files_only", &self.files_only)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .finish()
    }
}
