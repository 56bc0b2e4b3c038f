use std::fmt;

use fsops::FileSystem;
use logging::LogSink;

use crate::code::{CodeSet, OperationCode};
use crate::operation::{Operation, OperationOutcome};

/// Ordered operation list produced by planning.
///
/// Before execution it is the plan; afterwards each operation also carries
/// its outcome, so the same value doubles as the execution log.
#[derive(Debug, Default)]
pub struct MergePlan {
    operations: Vec<Operation>,
}

impl MergePlan {
    /// Creates an empty plan.
    pub const fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Appends an operation.
    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Operations in plan order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consumes the plan, returning its operations.
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Iterates over the operations in plan order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the plan has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Codes of every operation, in plan order.
    pub fn codes(&self) -> Vec<OperationCode> {
        self.operations.iter().map(Operation::code).collect()
    }

    /// Number of operations classified as `code`.
    pub fn count(&self, code: OperationCode) -> usize {
        self.operations
            .iter()
            .filter(|operation| operation.code() == code)
            .count()
    }

    /// Removes every operation whose code is in `excluded`, keeping the
    /// relative order of the rest. Returns how many were removed.
    pub fn exclude(&mut self, excluded: CodeSet) -> usize {
        let before = self.operations.len();
        self.operations
            .retain(|operation| !excluded.contains(operation.code()));
        before - self.operations.len()
    }

    /// Executes every operation in order.
    ///
    /// A failed operation never stops the ones after it.
    pub fn execute<F, S>(&mut self, fs: &F, sink: &mut S) -> ExecutionSummary
    where
        F: FileSystem + ?Sized,
        S: LogSink + ?Sized,
    {
        let mut summary = ExecutionSummary::default();
        for operation in &mut self.operations {
            summary.record(operation.execute(fs, sink));
        }
        summary
    }

    /// One report line per operation (see [`Operation`]'s `Display`).
    pub fn report_lines(&self) -> Vec<String> {
        self.operations.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a MergePlan {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Outcome counts for one execution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    completed: usize,
    warned: usize,
    failed: usize,
}

impl ExecutionSummary {
    fn record(&mut self, outcome: &OperationOutcome) {
        match outcome {
            OperationOutcome::Completed => self.completed += 1,
            OperationOutcome::Warned => self.warned += 1,
            OperationOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Operations that succeeded.
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Conflict warnings reported.
    pub const fn warned(&self) -> usize {
        self.warned
    }

    /// Operations the filesystem rejected.
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Operations executed in total.
    pub const fn executed(&self) -> usize {
        self.completed + self.warned + self.failed
    }

    /// Whether any operation failed.
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for ExecutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} executed: {} completed, {} warned, {} failed",
            self.executed(),
            self.completed,
            self.warned,
            self.failed
        )
    }
}
