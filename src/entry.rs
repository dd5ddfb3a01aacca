use std::ffi::{OsStr, OsString};

/// One native directory-listing record, before filtering.
///
/// Produced by a [`Walker`](crate::traits::Walker) per step and dropped after
/// a single filter check. Walkers do no filtering of their own beyond
/// classifying the self/parent pseudo-entries as [`EntryKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub kind: EntryKind,
    pub name: OsString,
}

impl RawEntry {
    pub fn new(kind: EntryKind, name: impl Into<OsString>) -> Self {
        Self { kind, name: name.into() }
    }

    /// Whether this entry may be shown to the entry filter at all.
    ///
    /// `Other` covers ".", ".." and every native type that is neither a
    /// regular file nor a directory.
    pub fn is_candidate(&self) -> bool {
        self.kind != EntryKind::Other
    }
}

/// The kind of a raw entry, as reported by the platform listing itself.
///
/// No `stat()` is issued to refine this: whatever the native listing says is
/// what the filter sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory other than "." and "..".
    Dir,

    /// Anything else, including "." and "..".
    Other,
}

impl EntryKind {
    /// Classify a directory entry by name. Used by both platform walkers so
    /// the pseudo-entries are handled identically.
    pub(crate) fn dir_named(name: &OsStr) -> Self {
        if is_dot_or_dotdot(name) {
            Self::Other
        } else {
            Self::Dir
        }
    }
}

fn is_dot_or_dotdot(name: &OsStr) -> bool {
    name == "." || name == ".."
}
