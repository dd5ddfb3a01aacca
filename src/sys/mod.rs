//! Native directory search, one backend per target family.
//!
//! Exactly one backend is compiled in; the choice is never made at runtime.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::DirStream as PlatformWalker;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::FindHandle as PlatformWalker;

#[cfg(not(any(unix, windows)))]
compile_error!("dircursor supports Unix and Windows targets only");
