//! [`FileSystem`] backed by the local disk.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::FileTime;

use crate::adapter::FileSystem;
use crate::error::FsError;
use crate::walker::{TreeWalkBuilder, tree_size};

/// Local-disk implementation of [`FileSystem`].
///
/// Copies are guarded by a free-space check: the source size (a file's length
/// or the summed size of a tree's files) must not exceed
/// `max_use_of_free_space` times the free space at the destination. Each copy
/// is checked against free space at call time.
#[derive(Clone, Copy, Debug)]
pub struct LocalFileSystem {
    max_use_of_free_space: f64,
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalFileSystem {
    /// Creates an adapter that may use all free space at the destination.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_use_of_free_space: 1.0,
        }
    }

    /// Limits copies to `fraction` of the destination's free space.
    ///
    /// Values outside `0.0..=1.0` are clamped; NaN keeps the current value.
    #[must_use]
    pub fn with_max_use_of_free_space(mut self, fraction: f64) -> Self {
        if !fraction.is_nan() {
            self.max_use_of_free_space = fraction.clamp(0.0, 1.0);
        }
        self
    }

    /// Fraction of free space a single copy may use.
    #[must_use]
    pub const fn max_use_of_free_space(&self) -> f64 {
        self.max_use_of_free_space
    }

    fn space_allowance(&self, destination: &Path) -> Result<u64, FsError> {
        let probe = nearest_existing(destination);
        let free = fs2::available_space(&probe)
            .map_err(|error| FsError::io("query free space at", probe, error))?;
        Ok((free as f64 * self.max_use_of_free_space) as u64)
    }
}

impl FileSystem for LocalFileSystem {
    fn list_entries(&self, path: &Path) -> Vec<OsString> {
        match fs::read_dir(path) {
            Ok(read_dir) => read_dir
                .filter_map(Result::ok)
                .map(|entry| entry.file_name())
                .collect(),
            Err(error) => {
                tracing::debug!(
                    target: "dirmerge::compare",
                    path = %path.display(),
                    %error,
                    "directory listing unavailable; treating as empty"
                );
                Vec::new()
            }
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modification_time(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .ok()
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, FsError> {
        if !source.exists() {
            return Err(FsError::MissingSource {
                path: source.to_path_buf(),
            });
        }
        if is_same_entry(source, destination) {
            tracing::debug!(
                target: "dirmerge::copy",
                path = %source.display(),
                "source and destination are the same entry; nothing to copy"
            );
            return Ok(0);
        }

        let allowance = self.space_allowance(destination)?;
        let required = tree_size(source)?;
        if required > allowance {
            return Err(FsError::InsufficientSpace {
                path: source.to_path_buf(),
                required,
                allowance,
            });
        }

        if source.is_file() {
            tracing::debug!(
                target: "dirmerge::copy",
                source = %source.display(),
                destination = %destination.display(),
                "copying file"
            );
            copy_file(source, destination)
        } else {
            tracing::debug!(
                target: "dirmerge::copy",
                source = %source.display(),
                destination = %destination.display(),
                "copying directory"
            );
            copy_tree(source, destination)
        }
    }

    fn make_directory(&self, path: &Path) -> Result<(), FsError> {
        match fs::create_dir(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(error) => Err(FsError::io("create directory", path, error)),
        }
    }

    fn make_directory_all(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path).map_err(|error| FsError::io("create directory", path, error))
    }

    fn delete(&self, path: &Path) -> Result<(), FsError> {
        let metadata =
            fs::symlink_metadata(path).map_err(|error| FsError::io("inspect", path, error))?;
        if metadata.is_dir() {
            fs::remove_dir_all(path).map_err(|error| FsError::io("delete directory", path, error))
        } else {
            fs::remove_file(path).map_err(|error| FsError::io("delete file", path, error))
        }
    }
}

/// Copies one file, carrying over its modification time.
fn copy_file(source: &Path, destination: &Path) -> Result<u64, FsError> {
    let bytes = fs::copy(source, destination)
        .map_err(|error| FsError::io("copy file to", destination, error))?;
    let metadata = fs::metadata(source).map_err(|error| FsError::io("inspect", source, error))?;
    filetime::set_file_mtime(destination, FileTime::from_last_modification_time(&metadata))
        .map_err(|error| FsError::io("set modification time of", destination, error))?;
    Ok(bytes)
}

/// Recreates the tree at `source` under a new `destination`.
///
/// Symlinks are followed, as in [`tree_size`], so the space guard measures
/// what is written.
fn copy_tree(source: &Path, destination: &Path) -> Result<u64, FsError> {
    if destination.exists() {
        return Err(FsError::DestinationExists {
            path: destination.to_path_buf(),
        });
    }
    fs::create_dir_all(destination)
        .map_err(|error| FsError::io("create directory", destination, error))?;

    let mut bytes = 0u64;
    for entry in TreeWalkBuilder::new(source).follow_symlinks(true).build()? {
        let entry = entry?;
        let target = destination.join(entry.relative_path());
        if entry.full_path().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|error| FsError::io("create directory", &target, error))?;
        } else {
            bytes = bytes.saturating_add(copy_file(entry.full_path(), &target)?);
        }
    }
    Ok(bytes)
}

fn is_same_entry(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

/// First of `path` and its ancestors that exists; `.` when none does.
fn nearest_existing(path: &Path) -> PathBuf {
    path.ancestors()
        .find(|ancestor| !ancestor.as_os_str().is_empty() && ancestor.exists())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
