use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure reported by a [`FileSystem`](crate::FileSystem) operation.
///
/// Every variant records the path involved so callers can surface actionable
/// diagnostics without matching on the variant.
#[derive(Debug, Error)]
pub enum FsError {
    /// An underlying I/O call failed.
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The copy source does not exist.
    #[error("source '{}' does not exist", path.display())]
    MissingSource {
        /// Missing source path.
        path: PathBuf,
    },
    /// The copy would use more than the allowed share of free space.
    #[error(
        "'{}' is too large to copy: {required} bytes needed, {allowance} bytes allowed",
        path.display()
    )]
    InsufficientSpace {
        /// Copy source.
        path: PathBuf,
        /// Bytes the copy needs.
        required: u64,
        /// Bytes the guard allows at the destination.
        allowance: u64,
    },
    /// A directory copy targets a path that already exists.
    #[error("destination '{}' already exists", path.display())]
    DestinationExists {
        /// Existing destination.
        path: PathBuf,
    },
    /// The path (or a required parent) does not exist.
    #[error("'{}' does not exist", path.display())]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },
    /// A test double was told to fail this operation.
    #[error("injected failure for '{}'", path.display())]
    Injected {
        /// Path the failure was injected for.
        path: PathBuf,
    },
}

impl FsError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Returns the filesystem path associated with the error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::MissingSource { path }
            | Self::InsufficientSpace { path, .. }
            | Self::DestinationExists { path }
            | Self::NotFound { path }
            | Self::Injected { path } => path,
        }
    }
}
