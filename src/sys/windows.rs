#![allow(unsafe_code)]

use std::ffi::OsString;
use std::io;
use std::iter;
use std::mem::MaybeUninit;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::Path;

use tracing::warn;
use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::Storage::FileSystem::{
    FindClose, FindFirstFileW, FindNextFileW, FILE_ATTRIBUTE_DIRECTORY, WIN32_FIND_DATAW,
};

use crate::entry::{EntryKind, RawEntry};
use crate::error::DirError;
use crate::traits::Walker;

/// An open `FindFirstFileW` search handle.
///
/// `FindFirstFileW` already returns the first record, so it is held back
/// and handed out by the first `fetch_next`. Closed with `FindClose` when
/// dropped.
pub struct FindHandle {
    handle: HANDLE,
    first:  Option<RawEntry>,
}

// SAFETY: a find handle may be used from any thread. FindHandle owns it
// exclusively and every access goes through `&mut self`.
unsafe impl Send for FindHandle {}

impl Walker for FindHandle {
    fn open(path: &Path) -> Result<Self, DirError> {
        // "" would join to a search of the current directory; opendir("")
        // fails with ENOENT, so match it.
        if path.as_os_str().is_empty() {
            return Err(DirError::NotFound(path.to_path_buf()));
        }

        let pattern: Vec<u16> = path
            .join("*.*")
            .as_os_str()
            .encode_wide()
            .chain(iter::once(0))
            .collect();
        if pattern[..pattern.len() - 1].contains(&0) {
            return Err(DirError::InvalidPath(path.to_path_buf()));
        }

        let mut data = MaybeUninit::<WIN32_FIND_DATAW>::uninit();
        // SAFETY: pattern is NUL-terminated; data is writable for one record.
        let handle = unsafe { FindFirstFileW(pattern.as_ptr(), data.as_mut_ptr()) };
        if handle == INVALID_HANDLE_VALUE {
            return Err(DirError::from_io(path, io::Error::last_os_error()));
        }

        // SAFETY: FindFirstFileW succeeded, so it filled in data.
        let data = unsafe { data.assume_init() };
        Ok(Self {
            handle,
            first: Some(raw_entry(&data)),
        })
    }

    fn fetch_next(&mut self) -> Option<RawEntry> {
        if let Some(entry) = self.first.take() {
            return Some(entry);
        }

        let mut data = MaybeUninit::<WIN32_FIND_DATAW>::uninit();
        // SAFETY: self.handle is open until drop; data is writable.
        if unsafe { FindNextFileW(self.handle, data.as_mut_ptr()) } == 0 {
            // ERROR_NO_MORE_FILES, or a read error; both end the listing.
            return None;
        }
        // SAFETY: FindNextFileW succeeded, so it filled in data.
        let data = unsafe { data.assume_init() };
        Some(raw_entry(&data))
    }
}

impl Drop for FindHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from FindFirstFileW and is closed only here.
        if unsafe { FindClose(self.handle) } == 0 {
            warn!(error = %io::Error::last_os_error(), "FindClose failed");
        }
    }
}

fn raw_entry(data: &WIN32_FIND_DATAW) -> RawEntry {
    let len = data
        .cFileName
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(data.cFileName.len());
    let name = OsString::from_wide(&data.cFileName[..len]);

    let kind = if data.dwFileAttributes & FILE_ATTRIBUTE_DIRECTORY != 0 {
        EntryKind::dir_named(&name)
    } else {
        EntryKind::File
    };
    RawEntry { kind, name }
}
