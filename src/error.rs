use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirError {
    // Open
    #[error("directory not found")]
    NotFound(PathBuf),

    #[error("permission denied")]
    PermissionDenied(PathBuf),

    #[error("not a directory")]
    NotADirectory(PathBuf),

    #[error("path cannot be passed to the platform")]
    InvalidPath(PathBuf),

    // Config
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    // Runtime
    #[error("IO error")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DirError {
    /// Classify an OS error raised while opening `path`.
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound         => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            io::ErrorKind::NotADirectory    => Self::NotADirectory(path),
            _                               => Self::Io { path, source: err },
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotADirectory(p)
            | Self::InvalidPath(p)
            | Self::Io { path: p, .. } => Some(p),
            Self::InvalidPattern(_) => None,
        }
    }

    /// Whether the directory simply isn't there (or isn't a directory).
    ///
    /// Callers that want to tell "nothing to list" apart from "could not
    /// look" check this on the result of
    /// [`DirSpec::try_cursor`](crate::DirSpec::try_cursor).
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NotADirectory(_))
    }
}
