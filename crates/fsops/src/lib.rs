#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `fsops` is the filesystem layer underneath the merge engine. The engine
//! never touches the disk directly; it asks a [`FileSystem`] for listings,
//! kinds and modification times while planning, and for copies and directory
//! creation while executing.
//!
//! # Design
//!
//! - [`FileSystem`] is the adapter trait. Reads never fail (a missing
//!   directory lists as empty) while mutations return [`FsError`].
//! - [`LocalFileSystem`] works against the real disk. Copies preserve file
//!   modification times and refuse to run when the source is larger than the
//!   configured fraction of free space at the destination.
//! - [`MemoryFileSystem`] holds a tree in memory and can be told to fail
//!   specific copies.
//! - [`DryRunFileSystem`] wraps any adapter, reads through it and records
//!   mutations instead of applying them.
//! - [`TreeWalker`] enumerates a local tree in sorted depth-first order; tree
//!   copies and size calculations are built on it.
//!
//! # Examples
//!
//! ```
//! use fsops::{FileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new()
//!     .with_file("a/notes.txt", 12, 100)
//!     .with_dir("out");
//!
//! let copied = fs.copy(Path::new("a/notes.txt"), Path::new("out/notes.txt"))?;
//! assert_eq!(copied, 12);
//! assert!(fs.is_file(Path::new("out/notes.txt")));
//! # Ok::<(), fsops::FsError>(())
//! ```

mod adapter;
mod dry_run;
mod error;
mod local;
mod memory;
mod walker;

pub use adapter::FileSystem;
pub use dry_run::{DryRunFileSystem, DryRunMutation};
pub use error::FsError;
pub use local::LocalFileSystem;
pub use memory::{MemoryFileSystem, MemoryNode};
pub use walker::{TreeEntry, TreeWalkBuilder, TreeWalker, tree_size};

#[cfg(test)]
mod tests;
