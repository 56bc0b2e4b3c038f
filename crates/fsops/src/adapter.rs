use std::ffi::OsString;
use std::path::Path;
use std::time::SystemTime;

use crate::error::FsError;

/// Filesystem primitives consumed by the merge engine.
///
/// Every primitive can be substituted: [`LocalFileSystem`](crate::LocalFileSystem)
/// backs onto the real disk, [`MemoryFileSystem`](crate::MemoryFileSystem) keeps
/// a tree in memory, and [`DryRunFileSystem`](crate::DryRunFileSystem) turns
/// mutations into no-ops. Mutating calls report failure through their return
/// value and never panic.
pub trait FileSystem {
    /// Names of the entries directly under `path`, in no particular order.
    ///
    /// A missing or unreadable directory yields an empty list.
    fn list_entries(&self, path: &Path) -> Vec<OsString>;

    /// Whether `path` is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Modification time of `path`, when it can be read.
    fn modification_time(&self, path: &Path) -> Option<SystemTime>;

    /// Copies a file or a whole tree from `source` to `destination`.
    ///
    /// Returns the number of bytes copied. Implementations refuse, without
    /// touching the destination, when the source is larger than their allowed
    /// share of the destination's free space.
    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, FsError>;

    /// Creates the directory `path`. Succeeds if it already exists.
    fn make_directory(&self, path: &Path) -> Result<(), FsError>;

    /// Creates `path` and any missing ancestors.
    fn make_directory_all(&self, path: &Path) -> Result<(), FsError> {
        let mut missing = Vec::new();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() || self.exists(ancestor) {
                break;
            }
            missing.push(ancestor);
        }
        for directory in missing.into_iter().rev() {
            self.make_directory(directory)?;
        }
        Ok(())
    }

    /// Deletes a file or a whole tree.
    fn delete(&self, path: &Path) -> Result<(), FsError>;
}

impl<F> FileSystem for &F
where
    F: FileSystem + ?Sized,
{
    fn list_entries(&self, path: &Path) -> Vec<OsString> {
        (**self).list_entries(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn modification_time(&self, path: &Path) -> Option<SystemTime> {
        (**self).modification_time(path)
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, FsError> {
        (**self).copy(source, destination)
    }

    fn make_directory(&self, path: &Path) -> Result<(), FsError> {
        (**self).make_directory(path)
    }

    fn make_directory_all(&self, path: &Path) -> Result<(), FsError> {
        (**self).make_directory_all(path)
    }

    fn delete(&self, path: &Path) -> Result<(), FsError> {
        (**self).delete(path)
    }
}
