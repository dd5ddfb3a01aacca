use std::ffi::{OsStr, OsString};
use std::path::Path;

use ignore::overrides::{Override, OverrideBuilder};

use crate::entry::{EntryKind, RawEntry};
use crate::error::DirError;
use crate::traits::NameFilter;

// ---------------------------------------------------------------------------
// Entry filter
// ---------------------------------------------------------------------------

/// The inclusion rule applied to every candidate entry.
///
/// Pure: the result depends only on the arguments (and on the predicate
/// being deterministic). Pseudo-entries never get here; callers check
/// [`RawEntry::is_candidate`] first.
pub(crate) fn accepts(
    entry:      &RawEntry,
    files_only: bool,
    predicate:  Option<&Predicate>,
) -> bool {
    if files_only && entry.kind != EntryKind::File {
        return false;
    }
    match predicate {
        Some(p) => p.is_match(entry),
        None    => true,
    }
}

/// A name predicate as stored on a spec.
///
/// Globs are kept apart from opaque name filters because gitignore
/// directory patterns (`sub/`) need the entry kind, not just the name.
pub(crate) enum Predicate {
    Name(Box<dyn NameFilter>),
    Glob(GlobMatcher),
}

impl Predicate {
    fn is_match(&self, entry: &RawEntry) -> bool {
        match self {
            Self::Name(f) => f.is_match(&entry.name),
            Self::Glob(g) => g.is_match(&entry.name, entry.kind == EntryKind::Dir),
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in filters
// ---------------------------------------------------------------------------

/// Matches names containing `pattern` (case-insensitive).
///
/// Non-UTF-8 names are compared through their lossy rendering.
pub(crate) struct SubstringMatcher {
    pattern: String,
}

impl SubstringMatcher {
    pub(crate) fn new(pattern: &str) -> Self {
        Self { pattern: pattern.to_lowercase() }
    }
}

impl NameFilter for SubstringMatcher {
    fn is_match(&self, name: &OsStr) -> bool {
        name.to_string_lossy().to_lowercase().contains(&self.pattern)
    }
}

/// Matches names whose extension equals `ext` (ASCII case-insensitive).
pub(crate) struct ExtensionMatcher {
    ext: OsString,
}

impl ExtensionMatcher {
    pub(crate) fn new(ext: &str) -> Self {
        Self { ext: OsString::from(ext.trim_start_matches('.')) }
    }
}

impl NameFilter for ExtensionMatcher {
    fn is_match(&self, name: &OsStr) -> bool {
        Path::new(name)
            .extension()
            .map(|e| e.eq_ignore_ascii_case(&self.ext))
            .unwrap_or(false)
    }
}

/// Matches names against gitignore-style globs.
///
/// A plain glob (`*.txt`) selects names; a negated glob (`!*.log`) rejects
/// them. As soon as one plain glob is present, entries matching none of the
/// plain globs are rejected too. A trailing `/` restricts a glob to
/// directories.
pub(crate) struct GlobMatcher {
    globs: Override,
}

impl GlobMatcher {
    pub(crate) fn new<I, S>(patterns: I) -> Result<Self, DirError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = OverrideBuilder::new(".");
        for pattern in patterns {
            builder
                .add(pattern.as_ref())
                .map_err(|e| DirError::InvalidPattern(e.to_string()))?;
        }
        let globs = builder
            .build()
            .map_err(|e| DirError::InvalidPattern(e.to_string()))?;
        Ok(Self { globs })
    }

    /// `is_dir` lets directory-only globs (`sub/`) apply.
    pub(crate) fn is_match(&self, name: &OsStr, is_dir: bool) -> bool {
        let m = self.globs.matched(Path::new(name), is_dir);
        if m.is_none() {
            // Unmatched directories come back as `None` even when plain
            // globs exist; treat them like unmatched files.
            self.globs.num_whitelists() == 0
        } else {
            m.is_whitelist()
        }
    }
}
