use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FsError;

/// Configures a depth-first traversal of a local tree.
///
/// Siblings are visited in lexicographic order so tree copies and size
/// calculations are deterministic regardless of the filesystem's own iteration
/// order. The root itself is never yielded.
#[derive(Clone, Debug)]
pub struct TreeWalkBuilder {
    root: PathBuf,
    follow_symlinks: bool,
}

impl TreeWalkBuilder {
    /// Creates a builder that will traverse `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
        }
    }

    /// Descend into symlinked directories. A directory that is already one of
    /// the current entry's ancestors is yielded but not entered again.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Builds the walker. Fails when the root cannot be inspected.
    pub fn build(self) -> Result<TreeWalker, FsError> {
        let metadata = fs::symlink_metadata(&self.root)
            .map_err(|error| FsError::io("inspect", &self.root, error))?;

        let mut walker = TreeWalker {
            follow_symlinks: self.follow_symlinks,
            stack: Vec::new(),
            ancestors: HashSet::new(),
            finished: false,
        };

        let is_dir = metadata.is_dir()
            || (self.follow_symlinks && metadata.file_type().is_symlink() && self.root.is_dir());
        if is_dir {
            walker.push_directory(self.root, PathBuf::new(), 0)?;
        }
        Ok(walker)
    }
}

/// Depth-first iterator over the entries below a root.
#[derive(Debug)]
pub struct TreeWalker {
    follow_symlinks: bool,
    stack: Vec<DirectoryState>,
    ancestors: HashSet<PathBuf>,
    finished: bool,
}

impl TreeWalker {
    fn push_directory(
        &mut self,
        fs_path: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
    ) -> Result<(), FsError> {
        let canonical =
            fs::canonicalize(&fs_path).map_err(|error| FsError::io("canonicalize", &fs_path, error))?;
        if self.ancestors.contains(&canonical) {
            return Ok(());
        }

        let state = DirectoryState::new(fs_path, canonical.clone(), relative_prefix, depth)?;
        self.ancestors.insert(canonical);
        self.stack.push(state);
        Ok(())
    }

    fn pop_directory(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.ancestors.remove(&state.canonical);
        }
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<TreeEntry, FsError> {
        let metadata = fs::symlink_metadata(&full_path)
            .map_err(|error| FsError::io("inspect", &full_path, error))?;

        let descend = metadata.is_dir()
            || (self.follow_symlinks && metadata.file_type().is_symlink() && full_path.is_dir());
        if descend {
            self.push_directory(full_path.clone(), relative_path.clone(), depth)?;
        }

        Ok(TreeEntry {
            full_path,
            relative_path,
            metadata,
            depth,
        })
    }
}

impl Iterator for TreeWalker {
    type Item = Result<TreeEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let state = self.stack.last_mut()?;
            let Some(name) = state.next_name() else {
                self.pop_directory();
                continue;
            };
            let full_path = state.fs_path.join(&name);
            let relative_path = state.relative_prefix.join(&name);
            let depth = state.depth + 1;

            return match self.prepare_entry(full_path, relative_path, depth) {
                Ok(entry) => Some(Ok(entry)),
                Err(error) => {
                    self.finished = true;
                    Some(Err(error))
                }
            };
        }
    }
}

#[derive(Clone, Debug)]
struct DirectoryState {
    fs_path: PathBuf,
    canonical: PathBuf,
    relative_prefix: PathBuf,
    entries: Vec<OsString>,
    index: usize,
    depth: usize,
}

impl DirectoryState {
    fn new(
        fs_path: PathBuf,
        canonical: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
    ) -> Result<Self, FsError> {
        let read_dir =
            fs::read_dir(&fs_path).map_err(|error| FsError::io("read directory", &fs_path, error))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|error| FsError::io("read entry in", &fs_path, error))?;
            entries.push(entry.file_name());
        }
        entries.sort();

        Ok(Self {
            fs_path,
            canonical,
            relative_prefix,
            entries,
            index: 0,
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.entries.get(self.index)?.clone();
        self.index += 1;
        Some(name)
    }
}

/// One entry produced by [`TreeWalker`].
#[derive(Debug)]
pub struct TreeEntry {
    full_path: PathBuf,
    relative_path: PathBuf,
    metadata: fs::Metadata,
    depth: usize,
}

impl TreeEntry {
    /// Path on disk.
    #[must_use]
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the walk root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Metadata of the entry itself (symlinks are not followed).
    #[must_use]
    pub const fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }

    /// Depth below the root; direct children have depth `1`.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// Total size in bytes of the regular files in a tree.
///
/// Symlinks are followed, matching what a tree copy writes. A file root
/// reports its own length.
pub fn tree_size(root: &Path) -> Result<u64, FsError> {
    let metadata = fs::metadata(root).map_err(|error| FsError::io("inspect", root, error))?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut total = 0u64;
    for entry in TreeWalkBuilder::new(root).follow_symlinks(true).build()? {
        let entry = entry?;
        let target = if entry.metadata().file_type().is_symlink() {
            fs::metadata(entry.full_path())
                .map_err(|error| FsError::io("inspect", entry.full_path(), error))?
        } else {
            entry.metadata().clone()
        };
        if target.is_file() {
            total = total.saturating_add(target.len());
        }
    }
    Ok(total)
}
