//! In-memory [`FileSystem`] for tests and previews.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::adapter::FileSystem;
use crate::error::FsError;

/// Node stored by [`MemoryFileSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryNode {
    /// Regular file with a size and modification time.
    File {
        /// Length in bytes.
        size: u64,
        /// Modification time.
        modified: SystemTime,
    },
    /// Directory.
    Directory,
}

#[derive(Debug)]
struct MemoryState {
    nodes: BTreeMap<PathBuf, MemoryNode>,
    free_space: u64,
    failing: BTreeSet<PathBuf>,
    copies: usize,
}

/// Thread-safe in-memory tree.
///
/// Paths are compared component-wise, so `a/b` and `a//b` name the same node.
/// Adding a node creates its missing ancestors as directories. Copies consume
/// free space; copies whose source was registered with
/// [`fail_copies_from`](Self::fail_copies_from) fail with [`FsError::Injected`].
#[derive(Debug)]
pub struct MemoryFileSystem {
    state: Mutex<MemoryState>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    /// Creates an empty tree with unlimited free space.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                nodes: BTreeMap::new(),
                free_space: u64::MAX,
                failing: BTreeSet::new(),
                copies: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a directory (and its ancestors).
    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        {
            let mut state = self.state();
            insert_ancestors(&mut state.nodes, path.as_ref());
            state
                .nodes
                .insert(path.as_ref().to_path_buf(), MemoryNode::Directory);
        }
        self
    }

    /// Adds a file of `size` bytes modified `mtime_secs` seconds after the epoch.
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, size: u64, mtime_secs: u64) -> Self {
        {
            let mut state = self.state();
            insert_ancestors(&mut state.nodes, path.as_ref());
            state.nodes.insert(
                path.as_ref().to_path_buf(),
                MemoryNode::File {
                    size,
                    modified: UNIX_EPOCH + Duration::from_secs(mtime_secs),
                },
            );
        }
        self
    }

    /// Sets the bytes available to copies.
    #[must_use]
    pub fn with_free_space(self, bytes: u64) -> Self {
        self.state().free_space = bytes;
        self
    }

    /// Makes every copy whose source is `path` fail.
    #[must_use]
    pub fn fail_copies_from(self, path: impl AsRef<Path>) -> Self {
        self.state().failing.insert(path.as_ref().to_path_buf());
        self
    }

    /// Returns the node at `path`.
    #[must_use]
    pub fn node(&self, path: impl AsRef<Path>) -> Option<MemoryNode> {
        self.state().nodes.get(path.as_ref()).copied()
    }

    /// Every stored path, in sorted order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.state().nodes.keys().cloned().collect()
    }

    /// Remaining free space.
    #[must_use]
    pub fn free_space(&self) -> u64 {
        self.state().free_space
    }

    /// Number of copies that completed.
    #[must_use]
    pub fn copies(&self) -> usize {
        self.state().copies
    }
}

fn insert_ancestors(nodes: &mut BTreeMap<PathBuf, MemoryNode>, path: &Path) {
    for ancestor in path.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        nodes
            .entry(ancestor.to_path_buf())
            .or_insert(MemoryNode::Directory);
    }
}

fn subtree(nodes: &BTreeMap<PathBuf, MemoryNode>, root: &Path) -> Vec<(PathBuf, MemoryNode)> {
    nodes
        .iter()
        .filter(|(path, _)| path.starts_with(root))
        .map(|(path, node)| (path.clone(), *node))
        .collect()
}

fn parent_is_directory(nodes: &BTreeMap<PathBuf, MemoryNode>, path: &Path) -> bool {
    match path.parent() {
        None => true,
        Some(parent) if parent.as_os_str().is_empty() => true,
        Some(parent) => matches!(nodes.get(parent), Some(MemoryNode::Directory)),
    }
}

fn missing_parent(path: &Path) -> FsError {
    FsError::NotFound {
        path: path.parent().map_or_else(PathBuf::new, Path::to_path_buf),
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_entries(&self, path: &Path) -> Vec<OsString> {
        let state = self.state();
        if !matches!(state.nodes.get(path), Some(MemoryNode::Directory)) {
            return Vec::new();
        }
        state
            .nodes
            .keys()
            .filter(|candidate| candidate.parent() == Some(path))
            .filter_map(|candidate| candidate.file_name().map(OsString::from))
            .collect()
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.state().nodes.get(path), Some(MemoryNode::File { .. }))
    }

    fn exists(&self, path: &Path) -> bool {
        self.state().nodes.contains_key(path)
    }

    fn modification_time(&self, path: &Path) -> Option<SystemTime> {
        match self.state().nodes.get(path) {
            Some(MemoryNode::File { modified, .. }) => Some(*modified),
            _ => None,
        }
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, FsError> {
        let mut state = self.state();
        let Some(root) = state.nodes.get(source).copied() else {
            return Err(FsError::MissingSource {
                path: source.to_path_buf(),
            });
        };
        if source == destination {
            return Ok(0);
        }
        if state.failing.contains(source) {
            return Err(FsError::Injected {
                path: source.to_path_buf(),
            });
        }

        let entries = subtree(&state.nodes, source);
        let required: u64 = entries
            .iter()
            .map(|(_, node)| match node {
                MemoryNode::File { size, .. } => *size,
                MemoryNode::Directory => 0,
            })
            .sum();
        if required > state.free_space {
            return Err(FsError::InsufficientSpace {
                path: source.to_path_buf(),
                required,
                allowance: state.free_space,
            });
        }
        if !parent_is_directory(&state.nodes, destination) {
            return Err(missing_parent(destination));
        }
        match (root, state.nodes.get(destination)) {
            (MemoryNode::Directory, Some(_)) | (MemoryNode::File { .. }, Some(MemoryNode::Directory)) => {
                return Err(FsError::DestinationExists {
                    path: destination.to_path_buf(),
                });
            }
            _ => {}
        }

        for (path, node) in entries {
            let relative = path.strip_prefix(source).unwrap_or(Path::new(""));
            let target = if relative.as_os_str().is_empty() {
                destination.to_path_buf()
            } else {
                destination.join(relative)
            };
            state.nodes.insert(target, node);
        }
        state.free_space -= required;
        state.copies += 1;
        Ok(required)
    }

    fn make_directory(&self, path: &Path) -> Result<(), FsError> {
        let mut state = self.state();
        match state.nodes.get(path) {
            Some(MemoryNode::Directory) => Ok(()),
            Some(MemoryNode::File { .. }) => Err(FsError::io(
                "create directory",
                path,
                io::Error::from(io::ErrorKind::AlreadyExists),
            )),
            None if !parent_is_directory(&state.nodes, path) => Err(missing_parent(path)),
            None => {
                state.nodes.insert(path.to_path_buf(), MemoryNode::Directory);
                Ok(())
            }
        }
    }

    fn delete(&self, path: &Path) -> Result<(), FsError> {
        let mut state = self.state();
        if !state.nodes.contains_key(path) {
            return Err(FsError::NotFound {
                path: path.to_path_buf(),
            });
        }
        state.nodes.retain(|candidate, _| !candidate.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fs: &MemoryFileSystem, path: &str) -> Vec<String> {
        let mut names: Vec<String> = fs
            .list_entries(Path::new(path))
            .into_iter()
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn adding_a_file_creates_its_ancestors() {
        let fs = MemoryFileSystem::new().with_file("a/b/c.txt", 3, 10);
        assert_eq!(fs.node("a"), Some(MemoryNode::Directory));
        assert_eq!(fs.node("a/b"), Some(MemoryNode::Directory));
        assert!(fs.is_file(Path::new("a/b/c.txt")));
        assert_eq!(names(&fs, "a"), vec!["b"]);
    }

    #[test]
    fn listing_a_file_or_missing_path_is_empty() {
        let fs = MemoryFileSystem::new().with_file("a/x", 1, 1);
        assert!(fs.list_entries(Path::new("a/x")).is_empty());
        assert!(fs.list_entries(Path::new("missing")).is_empty());
    }

    #[test]
    fn copying_a_tree_reroots_every_node() {
        let fs = MemoryFileSystem::new()
            .with_file("src/one.txt", 4, 1)
            .with_file("src/nested/two.txt", 6, 2)
            .with_dir("dst");

        let copied = fs
            .copy(Path::new("src"), Path::new("dst/src"))
            .expect("copy");

        assert_eq!(copied, 10);
        assert_eq!(fs.node("dst/src"), Some(MemoryNode::Directory));
        assert!(fs.is_file(Path::new("dst/src/nested/two.txt")));
        assert_eq!(fs.copies(), 1);
    }

    #[test]
    fn copy_over_existing_tree_is_refused() {
        let fs = MemoryFileSystem::new()
            .with_dir("src")
            .with_dir("dst/src");
        let error = fs
            .copy(Path::new("src"), Path::new("dst/src"))
            .unwrap_err();
        assert!(matches!(error, FsError::DestinationExists { .. }));
    }

    #[test]
    fn file_copy_overwrites_existing_file() {
        let fs = MemoryFileSystem::new()
            .with_file("a/x", 5, 100)
            .with_file("b/x", 1, 1);
        fs.copy(Path::new("a/x"), Path::new("b/x")).expect("copy");
        assert_eq!(
            fs.modification_time(Path::new("b/x")),
            Some(UNIX_EPOCH + Duration::from_secs(100))
        );
    }

    #[test]
    fn copy_larger_than_free_space_leaves_destination_untouched() {
        let fs = MemoryFileSystem::new()
            .with_file("a/big", 100, 1)
            .with_dir("b")
            .with_free_space(99);

        let error = fs.copy(Path::new("a/big"), Path::new("b/big")).unwrap_err();

        assert!(matches!(
            error,
            FsError::InsufficientSpace {
                required: 100,
                allowance: 99,
                ..
            }
        ));
        assert!(!fs.exists(Path::new("b/big")));
        assert_eq!(fs.free_space(), 99);
    }

    #[test]
    fn copy_requires_destination_parent() {
        let fs = MemoryFileSystem::new().with_file("a/x", 1, 1);
        let error = fs.copy(Path::new("a/x"), Path::new("out/x")).unwrap_err();
        assert!(matches!(error, FsError::NotFound { path } if path == Path::new("out")));
    }

    #[test]
    fn injected_failures_apply_to_matching_source() {
        let fs = MemoryFileSystem::new()
            .with_file("a/x", 1, 1)
            .with_file("a/y", 1, 1)
            .with_dir("b")
            .fail_copies_from("a/x");

        assert!(matches!(
            fs.copy(Path::new("a/x"), Path::new("b/x")),
            Err(FsError::Injected { .. })
        ));
        assert!(fs.copy(Path::new("a/y"), Path::new("b/y")).is_ok());
    }

    #[test]
    fn make_directory_is_idempotent() {
        let fs = MemoryFileSystem::new().with_dir("out");
        fs.make_directory(Path::new("out")).expect("existing dir");
        fs.make_directory(Path::new("out/new")).expect("new dir");
        fs.make_directory(Path::new("out/new")).expect("again");
        assert_eq!(fs.node("out/new"), Some(MemoryNode::Directory));
    }

    #[test]
    fn make_directory_all_creates_missing_ancestors() {
        let fs = MemoryFileSystem::new();
        fs.make_directory_all(Path::new("x/y/z")).expect("mkdir -p");
        assert_eq!(fs.paths(), vec![
            PathBuf::from("x"),
            PathBuf::from("x/y"),
            PathBuf::from("x/y/z"),
        ]);
    }

    #[test]
    fn delete_removes_subtree() {
        let fs = MemoryFileSystem::new()
            .with_file("a/b/c", 1, 1)
            .with_file("a2", 1, 1);
        fs.delete(Path::new("a")).expect("delete");
        assert_eq!(fs.paths(), vec![PathBuf::from("a2")]);
        assert!(matches!(
            fs.delete(Path::new("a")),
            Err(FsError::NotFound { .. })
        ));
    }
}
