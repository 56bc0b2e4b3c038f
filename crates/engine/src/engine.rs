//! Recursive two-tree comparison.
//!
//! Planning visits every relative position present under either root once.
//! At each position both sides are probed:
//!
//! - two files produce one newest-wins copy (ties go to B);
//! - a file facing a directory produces one conflict warning and stops there;
//! - two directories (a missing path counts as an empty directory) produce a
//!   `make-dir` for the destination, then recurse into names present on both
//!   sides, then copy names present only under A, then only under B.
//!
//! Planning only reads through the [`FileSystem`]. Execution is a separate
//! pass over the finished [`MergePlan`].

use std::collections::BTreeMap;
use std::fmt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fsops::FileSystem;
use logging::{LogCategory, LogSink, require_categories};

use crate::code::{CodeSet, OperationCode};
use crate::error::MergeError;
use crate::operation::{Action, Operation};
use crate::path_item::{PathItem, join_paths};
use crate::plan::{ExecutionSummary, MergePlan};

/// Caller-facing presets built on the single planning algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Both sides copied; newer file wins when both have one.
    #[default]
    Bidirectional,
    /// Only entries missing from the other side; copies create their parents.
    OneWayDiff,
    /// B is the destination itself; nothing is copied from B.
    IntoDestination,
}

impl MergeMode {
    /// Codes the mode always removes from the plan.
    pub const fn excluded_codes(self) -> CodeSet {
        match self {
            Self::Bidirectional => CodeSet::new(),
            Self::OneWayDiff => CodeSet::of(&[
                OperationCode::NewestFromA,
                OperationCode::NewestFromB,
                OperationCode::MakeDir,
            ]),
            Self::IntoDestination => CodeSet::of(&[OperationCode::CopyFromB]),
        }
    }

    /// Name accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bidirectional => "merge",
            Self::OneWayDiff => "diff",
            Self::IntoDestination => "into",
        }
    }

    const fn copies_create_parents(self) -> bool {
        matches!(self, Self::OneWayDiff)
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMode {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" | "bidirectional" => Ok(Self::Bidirectional),
            "diff" | "one-way-diff" => Ok(Self::OneWayDiff),
            "into" | "into-destination" => Ok(Self::IntoDestination),
            _ => Err(MergeError::UnknownMode(s.to_owned())),
        }
    }
}

/// Options controlling a [`MergeEngine`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    mode: MergeMode,
    excluded: CodeSet,
    execute: bool,
    trace_comparisons: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeOptions {
    /// Bidirectional merge, nothing extra excluded, executed immediately.
    pub const fn new() -> Self {
        Self {
            mode: MergeMode::Bidirectional,
            excluded: CodeSet::new(),
            execute: true,
            trace_comparisons: false,
        }
    }

    /// Selects the mode.
    #[must_use]
    pub const fn mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Excludes `code` on top of the mode's own exclusions.
    #[must_use]
    pub const fn exclude(mut self, code: OperationCode) -> Self {
        self.excluded.insert(code);
        self
    }

    /// Excludes every code in `codes` on top of the mode's own exclusions.
    #[must_use]
    pub const fn excluded(mut self, codes: CodeSet) -> Self {
        self.excluded = self.excluded.union(codes);
        self
    }

    /// Whether [`MergeEngine::run`] executes the filtered plan.
    #[must_use]
    pub const fn execute(mut self, execute: bool) -> Self {
        self.execute = execute;
        self
    }

    /// Log a line per compared position under [`LogCategory::Compare`].
    #[must_use]
    pub const fn trace_comparisons(mut self, trace: bool) -> Self {
        self.trace_comparisons = trace;
        self
    }

    /// Selected mode.
    pub const fn selected_mode(&self) -> MergeMode {
        self.mode
    }

    /// Codes removed for `mode`: the mode's own plus the caller's.
    pub const fn exclusions_for(&self, mode: MergeMode) -> CodeSet {
        mode.excluded_codes().union(self.excluded)
    }

    /// Whether runs execute the plan.
    pub const fn executes(&self) -> bool {
        self.execute
    }

    /// Whether comparisons are traced.
    pub const fn traces_comparisons(&self) -> bool {
        self.trace_comparisons
    }
}

/// Result of [`MergeEngine::run`].
#[derive(Debug)]
pub struct MergeRun {
    plan: MergePlan,
    planned: usize,
    excluded: usize,
    summary: Option<ExecutionSummary>,
}

impl MergeRun {
    /// The filtered plan, with outcomes when it was executed.
    pub const fn plan(&self) -> &MergePlan {
        &self.plan
    }

    /// Consumes the run, returning the plan.
    pub fn into_plan(self) -> MergePlan {
        self.plan
    }

    /// Operations planned before filtering.
    pub const fn planned(&self) -> usize {
        self.planned
    }

    /// Operations removed by the exclusion filter.
    pub const fn excluded(&self) -> usize {
        self.excluded
    }

    /// Execution counts; `None` when the plan was not executed.
    pub const fn summary(&self) -> Option<ExecutionSummary> {
        self.summary
    }
}

/// Plans and optionally executes merges through a [`FileSystem`].
#[derive(Debug)]
pub struct MergeEngine<F> {
    fs: F,
    options: MergeOptions,
}

impl<F: FileSystem> MergeEngine<F> {
    /// Creates an engine with default options.
    pub const fn new(fs: F) -> Self {
        Self {
            fs,
            options: MergeOptions::new(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub const fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// The filesystem the engine works through.
    pub const fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Categories a sink must support for [`run`](Self::run).
    pub fn required_categories(&self) -> Vec<LogCategory> {
        let mut categories = vec![
            LogCategory::General,
            LogCategory::Copy,
            LogCategory::Conflict,
        ];
        if self.options.trace_comparisons {
            categories.push(LogCategory::Compare);
        }
        categories
    }

    /// Plans a merge of `a` and `b` into `destination` without filtering or
    /// executing anything.
    pub fn plan<S>(
        &self,
        a: &PathItem,
        b: &PathItem,
        destination: &str,
        sink: &mut S,
    ) -> MergePlan
    where
        S: LogSink + ?Sized,
    {
        self.plan_for(self.options.mode, a, b, destination, sink)
    }

    fn plan_for<S>(
        &self,
        mode: MergeMode,
        a: &PathItem,
        b: &PathItem,
        destination: &str,
        sink: &mut S,
    ) -> MergePlan
    where
        S: LogSink + ?Sized,
    {
        let mut planner = Planner {
            fs: &self.fs,
            sink,
            destination,
            create_parents: mode.copies_create_parents(),
            trace: self.options.trace_comparisons,
            plan: MergePlan::new(),
        };
        planner.visit(a, b);
        planner.plan
    }

    /// Merges the trees at `a` and `b` into `destination` using the
    /// configured mode.
    ///
    /// The sink is validated before anything else happens. The plan is then
    /// filtered, the removed count is logged under
    /// [`LogCategory::General`], and the rest is executed in order when
    /// execution is enabled.
    pub fn run<S>(
        &self,
        a: &str,
        b: &str,
        destination: &str,
        sink: &mut S,
    ) -> Result<MergeRun, MergeError>
    where
        S: LogSink + ?Sized,
    {
        self.run_mode(self.options.mode, a, b, destination, sink)
    }

    /// Merges `a` into `destination`, treating the destination as tree B.
    ///
    /// Runs in [`MergeMode::IntoDestination`] whatever mode is configured.
    pub fn merge_into<S>(
        &self,
        a: &str,
        destination: &str,
        sink: &mut S,
    ) -> Result<MergeRun, MergeError>
    where
        S: LogSink + ?Sized,
    {
        self.run_mode(MergeMode::IntoDestination, a, destination, destination, sink)
    }

    fn run_mode<S>(
        &self,
        mode: MergeMode,
        a: &str,
        b: &str,
        destination: &str,
        sink: &mut S,
    ) -> Result<MergeRun, MergeError>
    where
        S: LogSink + ?Sized,
    {
        require_categories(sink, &self.required_categories())?;

        sink.log(
            LogCategory::General,
            &format!("Comparing \"{a}\" and \"{b}\" ({mode})"),
        );
        let mut plan = self.plan_for(
            mode,
            &PathItem::root(a),
            &PathItem::root(b),
            destination,
            sink,
        );
        let planned = plan.len();

        let excluded = plan.exclude(self.options.exclusions_for(mode));
        sink.log(
            LogCategory::General,
            &format!("Planned {planned} operations, excluded {excluded}"),
        );

        let summary = if self.options.execute {
            let summary = plan.execute(&self.fs, sink);
            sink.log(LogCategory::General, &format!("Finished: {summary}"));
            Some(summary)
        } else {
            None
        };

        Ok(MergeRun {
            plan,
            planned,
            excluded,
            summary,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

#[derive(Clone, Copy, Debug, Default)]
struct Presence {
    in_a: bool,
    in_b: bool,
}

struct Planner<'a, F: ?Sized, S: ?Sized> {
    fs: &'a F,
    sink: &'a mut S,
    destination: &'a str,
    create_parents: bool,
    trace: bool,
    plan: MergePlan,
}

impl<F, S> Planner<'_, F, S>
where
    F: FileSystem + ?Sized,
    S: LogSink + ?Sized,
{
    fn kind(&self, item: &PathItem) -> EntryKind {
        if self.fs.is_file(&item.full_path()) {
            EntryKind::File
        } else {
            EntryKind::Directory
        }
    }

    fn target(&self, item: &PathItem) -> PathBuf {
        PathBuf::from(join_paths(self.destination, item.tail()))
    }

    fn compare_trace(&mut self, message: impl FnOnce() -> String) {
        if self.trace {
            self.sink.log(LogCategory::Compare, &message());
        }
    }

    fn visit(&mut self, a: &PathItem, b: &PathItem) {
        match (self.kind(a), self.kind(b)) {
            (EntryKind::File, EntryKind::File) => self.newest(a, b),
            (EntryKind::Directory, EntryKind::Directory) => self.directories(a, b),
            _ => {
                self.compare_trace(|| format!("\"{}\": file and directory collide", Path::new(a.tail()).display()));
                self.plan.push(Operation::new(
                    OperationCode::NameKindConflict,
                    Action::WarnConflict {
                        first: a.full_path(),
                        second: b.full_path(),
                    },
                ));
            }
        }
    }

    fn newest(&mut self, a: &PathItem, b: &PathItem) {
        let a_time = self.fs.modification_time(&a.full_path());
        let b_time = self.fs.modification_time(&b.full_path());
        // Strictly newer wins; ties and an unreadable time on either side go to B.
        let a_is_newer = matches!((a_time, b_time), (Some(a_time), Some(b_time)) if a_time > b_time);
        let (code, newer) = if a_is_newer {
            (OperationCode::NewestFromA, a)
        } else {
            (OperationCode::NewestFromB, b)
        };
        self.compare_trace(|| {
            format!("\"{}\": both files, {code}", Path::new(a.tail()).display())
        });
        let action = self.copy_action(newer);
        self.plan.push(Operation::new(code, action));
    }

    fn directories(&mut self, a: &PathItem, b: &PathItem) {
        self.plan.push(Operation::new(OperationCode::MakeDir, Action::MakeDirectory {
            path: self.target(a),
        }));

        let mut names: BTreeMap<OsString, Presence> = BTreeMap::new();
        for name in self.names(a) {
            names.entry(name).or_default().in_a = true;
        }
        for name in self.names(b) {
            names.entry(name).or_default().in_b = true;
        }
        self.compare_trace(|| {
            format!(
                "\"{}\": both directories, {} distinct entries",
                Path::new(a.tail()).display(),
                names.len()
            )
        });

        for (name, _) in names.iter().filter(|(_, p)| p.in_a && p.in_b) {
            self.visit(&a.child(name), &b.child(name));
        }
        for (name, _) in names.iter().filter(|(_, p)| p.in_a && !p.in_b) {
            let action = self.copy_action(&a.child(name));
            self.plan.push(Operation::new(OperationCode::CopyFromA, action));
        }
        for (name, _) in names.iter().filter(|(_, p)| !p.in_a && p.in_b) {
            let action = self.copy_action(&b.child(name));
            self.plan.push(Operation::new(OperationCode::CopyFromB, action));
        }
    }

    fn copy_action(&self, source: &PathItem) -> Action {
        let (source, destination) = (source.full_path(), self.target(source));
        if self.create_parents {
            Action::CopyWithParents {
                source,
                destination,
            }
        } else {
            Action::Copy {
                source,
                destination,
            }
        }
    }

    fn names(&self, item: &PathItem) -> Vec<OsString> {
        self.fs.list_entries(&item.full_path())
    }
}
