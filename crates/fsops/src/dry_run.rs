use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use crate::adapter::FileSystem;
use crate::error::FsError;

/// Mutation recorded by [`DryRunFileSystem`] instead of being applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DryRunMutation {
    /// A copy from `source` to `destination`.
    Copy {
        /// Copy source.
        source: PathBuf,
        /// Copy destination.
        destination: PathBuf,
    },
    /// A directory creation.
    MakeDirectory(PathBuf),
    /// A deletion.
    Delete(PathBuf),
}

/// Wraps another [`FileSystem`], reading through it but only recording
/// mutations.
///
/// Every mutation reports success, which lets a plan be executed end to end
/// without touching the disk.
#[derive(Debug)]
pub struct DryRunFileSystem<F> {
    inner: F,
    recorded: Mutex<Vec<DryRunMutation>>,
}

impl<F> DryRunFileSystem<F> {
    /// Wraps `inner`.
    pub const fn new(inner: F) -> Self {
        Self {
            inner,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Mutations seen so far, in call order.
    pub fn recorded(&self) -> Vec<DryRunMutation> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the wrapped filesystem.
    pub fn into_inner(self) -> F {
        self.inner
    }

    fn record(&self, mutation: DryRunMutation) {
        tracing::debug!(target: "dirmerge::copy", ?mutation, "dry run: skipped");
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(mutation);
    }
}

impl<F: FileSystem> FileSystem for DryRunFileSystem<F> {
    fn list_entries(&self, path: &Path) -> Vec<OsString> {
        self.inner.list_entries(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner.is_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn modification_time(&self, path: &Path) -> Option<SystemTime> {
        self.inner.modification_time(path)
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, FsError> {
        self.record(DryRunMutation::Copy {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
        Ok(0)
    }

    fn make_directory(&self, path: &Path) -> Result<(), FsError> {
        self.record(DryRunMutation::MakeDirectory(path.to_path_buf()));
        Ok(())
    }

    fn make_directory_all(&self, path: &Path) -> Result<(), FsError> {
        self.make_directory(path)
    }

    fn delete(&self, path: &Path) -> Result<(), FsError> {
        self.record(DryRunMutation::Delete(path.to_path_buf()));
        Ok(())
    }
}
