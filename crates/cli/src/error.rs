use engine::MergeError;
use logging::LogError;
use thiserror::Error;

/// Problems detected before a merge starts.
///
/// Every variant maps onto exit code `1`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Fewer operands than the selected mode needs.
    #[error("missing operands: mode '{mode}' expects {expected}")]
    MissingOperands {
        /// Selected mode name.
        mode: &'static str,
        /// Operand synopsis for the mode.
        expected: &'static str,
    },
    /// An operand beyond what the selected mode accepts.
    #[error("unexpected operand '{operand}' for mode '{mode}'")]
    UnexpectedOperand {
        /// Selected mode name.
        mode: &'static str,
        /// The surplus operand, lossily converted.
        operand: String,
    },
    /// An operand or option value that is not valid UTF-8.
    #[error("{what} is not valid UTF-8: {value}")]
    NotUtf8 {
        /// Which argument carried the value.
        what: &'static str,
        /// The value, lossily converted.
        value: String,
    },
    /// `--max-free-fraction` outside `(0, 1]` or not a number.
    #[error("invalid --max-free-fraction '{0}': expected a number greater than 0 and at most 1")]
    InvalidFraction(String),
    /// Unknown mode or operation code.
    #[error(transparent)]
    Merge(#[from] MergeError),
    /// Log settings could not be loaded or applied.
    #[error(transparent)]
    Logging(#[from] LogError),
}
