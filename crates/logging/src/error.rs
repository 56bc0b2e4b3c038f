//! Error type for logging configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::category::LogCategory;

/// Errors raised while configuring or validating a log sink.
#[derive(Debug, Error)]
pub enum LogError {
    /// The sink does not handle one or more categories the caller needs.
    #[error("log sink is missing required categories: {}", join(.missing))]
    MissingCategories {
        /// Categories the sink did not register.
        missing: Vec<LogCategory>,
    },
    /// A category name did not match any known category.
    #[error("unknown log category '{0}'")]
    UnknownCategory(String),
    /// A message was logged to a category that was never registered.
    #[error("log category '{0}' was never registered")]
    Unregistered(LogCategory),
    /// Settings were structurally valid JSON but inconsistent.
    #[error("invalid logging settings: {0}")]
    InvalidSettings(String),
    /// A settings file could not be read.
    #[error("failed to read logging settings '{}': {source}", path.display())]
    ReadSettings {
        /// Settings file path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Settings JSON could not be parsed.
    #[error("failed to parse logging settings: {0}")]
    ParseSettings(#[from] serde_json::Error),
    /// A printer could not be opened.
    #[error("failed to open log file '{}': {source}", path.display())]
    Io {
        /// Log file path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

fn join(categories: &[LogCategory]) -> String {
    categories
        .iter()
        .map(|category| category.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
