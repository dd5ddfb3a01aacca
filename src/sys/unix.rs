#![allow(unsafe_code)]

use std::ffi::{CStr, CString, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr::NonNull;

use tracing::warn;

use crate::entry::{EntryKind, RawEntry};
use crate::error::DirError;
use crate::traits::Walker;

/// An open `DIR*` stream.
///
/// Closed with `closedir` when dropped. Entry kinds come straight from
/// `d_type`; `DT_UNKNOWN`, symlinks and special files are all
/// [`EntryKind::Other`].
pub struct DirStream {
    dir: NonNull<libc::DIR>,
}

// SAFETY: a DIR stream is not tied to the thread that opened it. DirStream
// owns it exclusively and every access goes through `&mut self`.
unsafe impl Send for DirStream {}

impl Walker for DirStream {
    fn open(path: &Path) -> Result<Self, DirError> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| DirError::InvalidPath(path.to_path_buf()))?;

        // SAFETY: c_path is NUL-terminated and outlives the call.
        let dir = unsafe { libc::opendir(c_path.as_ptr()) };

        match NonNull::new(dir) {
            Some(dir) => Ok(Self { dir }),
            None      => Err(DirError::from_io(path, io::Error::last_os_error())),
        }
    }

    fn fetch_next(&mut self) -> Option<RawEntry> {
        // SAFETY: self.dir is open until drop.
        let ent = unsafe { libc::readdir(self.dir.as_ptr()) };
        if ent.is_null() {
            // End of stream, or a read error; both end the listing.
            return None;
        }

        // SAFETY: ent points into the stream's buffer and stays valid until
        // the next readdir/closedir on it; the name is copied out before
        // either can happen.
        let (d_type, name) = unsafe { ((*ent).d_type, CStr::from_ptr((*ent).d_name.as_ptr())) };
        let name = OsStr::from_bytes(name.to_bytes());

        let kind = match d_type {
            libc::DT_REG => EntryKind::File,
            libc::DT_DIR => EntryKind::dir_named(name),
            _            => EntryKind::Other,
        };
        Some(RawEntry::new(kind, name))
    }
}

impl Drop for DirStream {
    fn drop(&mut self) {
        // SAFETY: the stream was opened by opendir and is closed only here.
        if unsafe { libc::closedir(self.dir.as_ptr()) } != 0 {
            warn!(error = %io::Error::last_os_error(), "closedir failed");
        }
    }
}
