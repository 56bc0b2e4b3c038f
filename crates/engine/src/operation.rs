use std::fmt;
use std::path::{Path, PathBuf};

use fsops::{FileSystem, FsError};
use logging::{LogCategory, LogSink};

use crate::code::OperationCode;

/// The work an [`Operation`] performs when executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Copy a file or tree.
    Copy {
        /// Entry to copy.
        source: PathBuf,
        /// Where the copy lands.
        destination: PathBuf,
    },
    /// Create the destination's missing parents, then copy.
    CopyWithParents {
        /// Entry to copy.
        source: PathBuf,
        /// Where the copy lands.
        destination: PathBuf,
    },
    /// Create a directory.
    MakeDirectory {
        /// Directory to create.
        path: PathBuf,
    },
    /// Report a file and a directory that share a relative name.
    WarnConflict {
        /// Entry under source A.
        first: PathBuf,
        /// Entry under source B.
        second: PathBuf,
    },
}

impl Action {
    /// Name of the action, as shown in reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Copy { .. } => "copy",
            Self::CopyWithParents { .. } => "copy_with_parents",
            Self::MakeDirectory { .. } => "make_directory",
            Self::WarnConflict { .. } => "warn_conflict",
        }
    }

    /// Arguments captured when the action was planned.
    pub fn arguments(&self) -> Vec<&Path> {
        match self {
            Self::Copy {
                source,
                destination,
            }
            | Self::CopyWithParents {
                source,
                destination,
            } => vec![source, destination],
            Self::MakeDirectory { path } => vec![path],
            Self::WarnConflict { first, second } => vec![first, second],
        }
    }

    fn perform<F, S>(&self, fs: &F, sink: &mut S) -> OperationOutcome
    where
        F: FileSystem + ?Sized,
        S: LogSink + ?Sized,
    {
        match self {
            Self::Copy {
                source,
                destination,
            } => copy(fs, sink, source, destination),
            Self::CopyWithParents {
                source,
                destination,
            } => {
                if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty())
                    && let Err(error) = fs.make_directory_all(parent)
                {
                    sink.log(
                        LogCategory::Copy,
                        &format!("Could not create parents of \"{}\": {error}", destination.display()),
                    );
                    return OperationOutcome::Failed(error);
                }
                copy(fs, sink, source, destination)
            }
            Self::MakeDirectory { path } => match fs.make_directory(path) {
                Ok(()) => OperationOutcome::Completed,
                Err(error) => {
                    sink.log(
                        LogCategory::General,
                        &format!("Could not create directory \"{}\": {error}", path.display()),
                    );
                    OperationOutcome::Failed(error)
                }
            },
            Self::WarnConflict { first, second } => {
                sink.log(
                    LogCategory::Conflict,
                    &format!(
                        "File and directory share a name (both have been skipped): {}, {}",
                        first.display(),
                        second.display()
                    ),
                );
                OperationOutcome::Warned
            }
        }
    }
}

fn copy<F, S>(fs: &F, sink: &mut S, source: &Path, destination: &Path) -> OperationOutcome
where
    F: FileSystem + ?Sized,
    S: LogSink + ?Sized,
{
    sink.log(
        LogCategory::Copy,
        &format!(
            "Copying \"{}\" to \"{}\"",
            source.display(),
            destination.display()
        ),
    );
    match fs.copy(source, destination) {
        Ok(_) => OperationOutcome::Completed,
        Err(error) => {
            sink.log(LogCategory::Copy, &format!("Copy failed: {error}"));
            OperationOutcome::Failed(error)
        }
    }
}

/// Result recorded on an executed [`Operation`].
#[derive(Debug)]
pub enum OperationOutcome {
    /// The action succeeded.
    Completed,
    /// The action reported a conflict and changed nothing.
    Warned,
    /// The filesystem rejected the action.
    Failed(FsError),
}

impl OperationOutcome {
    /// Whether the action failed.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("ok"),
            Self::Warned => f.write_str("warned"),
            Self::Failed(error) => write!(f, "failed: {error}"),
        }
    }
}

/// A planned unit of work: a code, an action and, once executed, its outcome.
///
/// The outcome is written at most once. Executing an operation a second time
/// returns the recorded outcome without running the action again.
#[derive(Debug)]
pub struct Operation {
    code: OperationCode,
    action: Action,
    outcome: Option<OperationOutcome>,
}

impl Operation {
    /// Creates a planned, unexecuted operation.
    pub const fn new(code: OperationCode, action: Action) -> Self {
        Self {
            code,
            action,
            outcome: None,
        }
    }

    /// Classification code.
    pub const fn code(&self) -> OperationCode {
        self.code
    }

    /// The planned action.
    pub const fn action(&self) -> &Action {
        &self.action
    }

    /// Shorthand for [`Action::name`].
    pub const fn name(&self) -> &'static str {
        self.action.name()
    }

    /// Shorthand for [`Action::arguments`].
    pub fn arguments(&self) -> Vec<&Path> {
        self.action.arguments()
    }

    /// Recorded outcome; `None` until executed.
    pub const fn outcome(&self) -> Option<&OperationOutcome> {
        self.outcome.as_ref()
    }

    /// Whether the operation has run.
    pub const fn is_executed(&self) -> bool {
        self.outcome.is_some()
    }

    /// Runs the action through `fs`, logging through `sink`, and records the
    /// outcome.
    pub fn execute<F, S>(&mut self, fs: &F, sink: &mut S) -> &OperationOutcome
    where
        F: FileSystem + ?Sized,
        S: LogSink + ?Sized,
    {
        self.outcome
            .get_or_insert_with(|| self.action.perform(fs, sink))
    }
}

impl fmt::Display for Operation {
    /// Renders `<code> <name>(<arguments>) => <outcome>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arguments = self
            .arguments()
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} {}({arguments}) => ", self.code, self.name())?;
        match &self.outcome {
            Some(outcome) => write!(f, "{outcome}"),
            None => f.write_str("planned"),
        }
    }
}
