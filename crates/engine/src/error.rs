//! Common error types for the engine crate.

use logging::LogError;
use thiserror::Error;

/// Errors that stop a merge before any filesystem mutation.
///
/// Failures of individual operations are never reported here; they are
/// recorded on the [`Operation`](crate::Operation) they belong to.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The log sink cannot handle a category the run needs.
    #[error(transparent)]
    Logging(#[from] LogError),
    /// An operation code name was not recognised.
    #[error("unknown operation code '{0}'")]
    UnknownCode(String),
    /// A merge mode name was not recognised.
    #[error("unknown merge mode '{0}' (expected merge, diff or into)")]
    UnknownMode(String),
}
