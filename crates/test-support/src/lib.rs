//! Helpers for building on-disk fixture trees in tests.
//!
//! Every helper panics on failure; they are only meant for test code.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempDir;

/// Temporary directory with helpers for laying out files at fixed mtimes.
///
/// The directory is removed when the fixture is dropped.
#[derive(Debug)]
pub struct TreeFixture {
    dir: TempDir,
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create fixture tempdir"),
        }
    }

    /// Root of the fixture.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the fixture.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Creates a directory (and its parents).
    pub fn dir(&self, relative: impl AsRef<Path>) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("create fixture directory");
        path
    }

    /// Writes `contents` to `relative` and sets its modification time to
    /// `mtime_secs` seconds after the epoch.
    pub fn file(&self, relative: impl AsRef<Path>, contents: &str, mtime_secs: i64) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent");
        }
        fs::write(&path, contents).expect("write fixture file");
        set_mtime(&path, mtime_secs);
        path
    }

    /// Reads `relative` as UTF-8.
    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        fs::read_to_string(self.path(relative)).expect("read fixture file")
    }

    /// Whether `relative` exists.
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }

    /// Modification time of `relative` in whole seconds.
    pub fn mtime_secs(&self, relative: impl AsRef<Path>) -> i64 {
        let metadata = fs::metadata(self.path(relative)).expect("fixture metadata");
        FileTime::from_last_modification_time(&metadata).unix_seconds()
    }

    /// Sorted paths below `relative`, relative to it. Directories end in `/`.
    pub fn listing(&self, relative: impl AsRef<Path>) -> Vec<String> {
        let base = self.path(relative);
        let mut out = Vec::new();
        collect(&base, &base, &mut out);
        out.sort();
        out
    }
}

/// Sets the modification time of `path` to `mtime_secs` seconds after the epoch.
pub fn set_mtime(path: &Path, mtime_secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(mtime_secs, 0))
        .expect("set fixture mtime");
}

fn collect(base: &Path, current: &Path, out: &mut Vec<String>) {
    let Ok(read_dir) = fs::read_dir(current) else {
        return;
    };
    for entry in read_dir {
        let path = entry.expect("fixture entry").path();
        let relative = path
            .strip_prefix(base)
            .expect("entry below base")
            .to_string_lossy()
            .replace('\\', "/");
        if path.is_dir() {
            out.push(format!("{relative}/"));
            collect(base, &path, out);
        } else {
            out.push(relative);
        }
    }
}
