#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` compares two directory trees and plans how to merge them into a
//! destination. Planning produces an ordered [`MergePlan`] of deferred
//! [`Operation`]s; nothing is mutated until the plan is executed, so the same
//! plan serves as a dry-run preview, a filter target, and (after execution)
//! the execution log.
//!
//! # Design
//!
//! - [`PathItem`] addresses an entry as a root plus a relative tail.
//! - [`OperationCode`] classifies operations; a [`CodeSet`] of codes can be
//!   excluded from a plan.
//! - [`Operation`] pairs a code with an [`Action`] and records its
//!   [`OperationOutcome`] at most once.
//! - [`MergeEngine`] walks both trees through a [`fsops::FileSystem`] and
//!   reports through a [`logging::LogSink`]. [`MergeMode`] selects the
//!   bidirectional merge, the one-way diff, or the merge into the destination.
//!
//! # Invariants
//!
//! - A directory's `make-dir` precedes every operation for its descendants.
//! - Within a directory, recursion into shared names comes first, then copies
//!   of names only under A, then copies of names only under B. Siblings are
//!   visited in byte order of their names.
//! - Two files with equal modification times resolve to B.
//! - Execution never stops early; every operation gets an outcome.
//!
//! # Examples
//!
//! ```
//! use engine::{MergeEngine, OperationCode};
//! use fsops::{FileSystem, MemoryFileSystem};
//! use logging::NoopSink;
//!
//! let fs = MemoryFileSystem::new()
//!     .with_file("a/notes.txt", 10, 100)
//!     .with_file("b/notes.txt", 10, 50)
//!     .with_dir("dest");
//!
//! let run = MergeEngine::new(&fs).run("a", "b", "dest", &mut NoopSink)?;
//!
//! assert_eq!(run.plan().codes(), vec![
//!     OperationCode::MakeDir,
//!     OperationCode::NewestFromA,
//! ]);
//! assert!(fs.is_file(std::path::Path::new("dest/notes.txt")));
//! # Ok::<(), engine::MergeError>(())
//! ```

mod code;
mod engine;
mod error;
mod operation;
mod path_item;
mod plan;

pub use code::{CodeSet, OperationCode};
pub use engine::{MergeEngine, MergeMode, MergeOptions, MergeRun};
pub use error::MergeError;
pub use operation::{Action, Operation, OperationOutcome};
pub use path_item::{PathItem, join_paths};
pub use plan::{ExecutionSummary, MergePlan};
