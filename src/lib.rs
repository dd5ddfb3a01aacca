//! # dircursor
//!
//! Lazy, filtered listing of a single directory, with the native search
//! handle released exactly once.
//!
//! A [`DirSpec`] says what to list: a directory, whether to keep regular
//! files only, and an optional name predicate. Names come out either by
//! pulling from a [`DirCursor`] or by pushing them into a callback with
//! [`DirSpec::for_each`]. Both use the platform listing directly (`readdir`
//! on Unix, `FindFirstFileW`/`FindNextFileW` on Windows) and never recurse,
//! sort, or cache.
//!
//! "." and ".." are never yielded. A directory that cannot be opened lists
//! as empty; [`DirSpec::try_cursor`] is there for callers who need to know
//! why.
//!
//! # Quick Start
//!
//! ```rust
//! use std::fs;
//!
//! let tmp = tempfile::tempdir().unwrap();
//! fs::write(tmp.path().join("a.txt"), "a").unwrap();
//! fs::write(tmp.path().join("b.log"), "b").unwrap();
//! fs::create_dir(tmp.path().join("sub")).unwrap();
//!
//! let spec = dircursor::dir(tmp.path())
//!     .files_only(true)
//!     .extension("txt");
//!
//! // Pull
//! let mut cursor = spec.cursor();
//! assert_eq!(cursor.pull().unwrap(), "a.txt");
//! assert_eq!(cursor.pull(), None);
//!
//! // Push
//! let mut seen = Vec::new();
//! spec.for_each(|name| seen.push(name.to_owned()));
//! assert_eq!(seen, ["a.txt"]);
//! ```
//!
//! # Missing directories
//!
//! ```rust
//! let spec = dircursor::dir("/definitely/not/here");
//!
//! assert_eq!(spec.cursor().count(), 0);
//! assert!(spec.try_cursor().unwrap_err().is_missing());
//! ```
//!
//! # Custom filters
//!
//! Any `Fn(&OsStr) -> bool` is a [`NameFilter`]:
//!
//! ```rust,no_run
//! use std::ffi::OsStr;
//!
//! let spec = dircursor::dir("logs")
//!     .filter(|name: &OsStr| name.len() > 8);
//!
//! for name in &spec {
//!     println!("{}", name.to_string_lossy());
//! }
//! ```

#![deny(unsafe_code)]

mod builder;
mod engine;
mod entry;
mod error;
mod filter;
mod results;
mod sys;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::DirSpec;
pub use engine::DirCursor;
pub use entry::{EntryKind, RawEntry};
pub use error::DirError;
pub use results::{Listing, ScanStats};
pub use sys::PlatformWalker;
pub use traits::{NameFilter, Walker};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a [`DirSpec`] for `path`, listing files and directories alike.
///
/// # Example
///
/// ```rust
/// let spec = dircursor::dir("src").files_only(true).matching("lib");
///
/// assert!(spec.is_files_only());
/// assert!(spec.has_filter());
/// ```
pub fn dir(path: impl Into<std::path::PathBuf>) -> DirSpec {
    DirSpec::new(path)
}
