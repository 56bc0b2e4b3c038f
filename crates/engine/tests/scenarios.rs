use std::path::{Path, PathBuf};

use engine::{
    Action, MergeEngine, MergeError, MergeMode, MergeOptions, OperationCode, OperationOutcome,
    PathItem,
};
use fsops::{DryRunFileSystem, DryRunMutation, FileSystem, FsError, MemoryFileSystem};
use logging::{LogCategory, LogRouter, MemoryPrinter, NoopSink};

fn plan_only() -> MergeOptions {
    MergeOptions::new().execute(false)
}

fn copy_targets(action: &Action) -> Option<(&Path, &Path)> {
    match action {
        Action::Copy {
            source,
            destination,
        }
        | Action::CopyWithParents {
            source,
            destination,
        } => Some((source, destination)),
        _ => None,
    }
}

#[test]
fn newer_file_in_a_wins() {
    let fs = MemoryFileSystem::new()
        .with_file("a/notes.txt", 3, 100)
        .with_file("b/notes.txt", 3, 50);
    let run = MergeEngine::new(&fs)
        .with_options(plan_only())
        .run("a", "b", "dest", &mut NoopSink)
        .unwrap();

    let plan = run.plan();
    assert_eq!(plan.codes(), vec![
        OperationCode::MakeDir,
        OperationCode::NewestFromA
    ]);
    let (source, destination) = copy_targets(plan.operations()[1].action()).unwrap();
    assert_eq!(source, Path::new("a/notes.txt"));
    assert_eq!(destination, Path::new("dest/notes.txt"));
}

#[test]
fn equal_mtimes_resolve_to_b() {
    let fs = MemoryFileSystem::new()
        .with_file("a/same.txt", 1, 77)
        .with_file("b/same.txt", 9, 77);
    let engine = MergeEngine::new(&fs);

    for _ in 0..3 {
        let plan = engine.plan(&PathItem::root("a"), &PathItem::root("b"), "dest", &mut NoopSink);
        assert_eq!(plan.count(OperationCode::NewestFromB), 1);
        assert_eq!(plan.count(OperationCode::NewestFromA), 0);
    }
}

#[test]
fn file_facing_directory_is_a_conflict_and_nothing_below_is_copied() {
    let fs = MemoryFileSystem::new()
        .with_file("a/photos/a.jpg", 5, 1)
        .with_file("b/photos", 5, 1);
    let plan = MergeEngine::new(&fs).plan(
        &PathItem::root("a"),
        &PathItem::root("b"),
        "dest",
        &mut NoopSink,
    );

    assert_eq!(plan.codes(), vec![
        OperationCode::MakeDir,
        OperationCode::NameKindConflict
    ]);
    assert_eq!(plan.operations()[1].arguments(), vec![
        Path::new("a/photos"),
        Path::new("b/photos")
    ]);
    assert!(
        plan.iter()
            .flat_map(|operation| operation.arguments())
            .all(|path| !path.ends_with("a.jpg"))
    );
}

#[test]
fn directory_only_in_a_subtree_is_copied_into_its_make_dir() {
    let fs = MemoryFileSystem::new()
        .with_file("a/docs/readme.md", 4, 1)
        .with_dir("b/docs");
    let plan = MergeEngine::new(&fs).plan(
        &PathItem::root("a"),
        &PathItem::root("b"),
        "dest",
        &mut NoopSink,
    );

    assert_eq!(plan.report_lines(), vec![
        "make-dir make_directory(dest) => planned",
        "make-dir make_directory(dest/docs) => planned",
        "copy-from-a copy(a/docs/readme.md, dest/docs/readme.md) => planned",
    ]);
}

#[test]
fn directory_missing_from_b_is_copied_whole() {
    let fs = MemoryFileSystem::new()
        .with_file("a/docs/readme.md", 4, 1)
        .with_dir("b");
    let plan = MergeEngine::new(&fs).plan(
        &PathItem::root("a"),
        &PathItem::root("b"),
        "dest",
        &mut NoopSink,
    );

    assert_eq!(plan.report_lines(), vec![
        "make-dir make_directory(dest) => planned",
        "copy-from-a copy(a/docs, dest/docs) => planned",
    ]);
}

#[test]
fn empty_roots_plan_one_make_dir() {
    let fs = MemoryFileSystem::new().with_dir("a").with_dir("b");
    let plan = MergeEngine::new(&fs).plan(
        &PathItem::root("a"),
        &PathItem::root("b"),
        "dest",
        &mut NoopSink,
    );

    assert_eq!(plan.len(), 1);
    assert_eq!(
        plan.operations()[0].action(),
        &Action::MakeDirectory {
            path: PathBuf::from("dest")
        }
    );
}

#[test]
fn merge_into_destination_never_copies_from_destination() {
    let fs = MemoryFileSystem::new()
        .with_file("a/x.txt", 2, 10)
        .with_file("dest/y.txt", 2, 10)
        .with_dir("dest/only-here");

    let run = MergeEngine::new(&fs)
        .merge_into("a", "dest", &mut NoopSink)
        .unwrap();

    assert_eq!(run.plan().count(OperationCode::CopyFromB), 0);
    assert_eq!(run.excluded(), 2);
    assert_eq!(run.plan().codes(), vec![
        OperationCode::MakeDir,
        OperationCode::CopyFromA
    ]);
    assert!(fs.is_file(Path::new("dest/x.txt")));
    assert!(fs.is_file(Path::new("dest/y.txt")));
}

#[test]
fn one_way_diff_of_identical_trees_is_empty() {
    let fs = MemoryFileSystem::new()
        .with_file("a/x", 1, 5)
        .with_file("a/sub/y", 1, 6)
        .with_file("b/x", 1, 5)
        .with_file("b/sub/y", 1, 6);

    let run = MergeEngine::new(&fs)
        .with_options(plan_only().mode(MergeMode::OneWayDiff))
        .run("a", "b", "dest", &mut NoopSink)
        .unwrap();

    assert!(run.plan().is_empty());
    assert_eq!(run.planned(), 4);
    assert_eq!(run.excluded(), 4);
}

#[test]
fn one_way_diff_copies_create_missing_parents() {
    let fs = MemoryFileSystem::new()
        .with_file("a/sub/deep/new.txt", 1, 5)
        .with_dir("b/sub");

    let run = MergeEngine::new(&fs)
        .with_options(MergeOptions::new().mode(MergeMode::OneWayDiff))
        .run("a", "b", "out", &mut NoopSink)
        .unwrap();

    assert_eq!(run.plan().codes(), vec![OperationCode::CopyFromA]);
    assert!(matches!(
        run.plan().operations()[0].action(),
        Action::CopyWithParents { .. }
    ));
    assert_eq!(run.summary().unwrap().completed(), 1);
    assert!(fs.is_file(Path::new("out/sub/deep/new.txt")));
}

#[test]
fn planning_is_repeatable_and_read_only() {
    let fs = MemoryFileSystem::new()
        .with_file("a/one", 1, 1)
        .with_file("a/shared/left", 1, 1)
        .with_file("b/shared/right", 1, 1)
        .with_file("b/two", 1, 1);
    let before = fs.paths();
    let engine = MergeEngine::new(&fs);

    let first = engine.plan(&PathItem::root("a"), &PathItem::root("b"), "d", &mut NoopSink);
    let second = engine.plan(&PathItem::root("a"), &PathItem::root("b"), "d", &mut NoopSink);

    assert_eq!(first.report_lines(), second.report_lines());
    assert_eq!(fs.paths(), before);
}

#[test]
fn shared_entries_come_before_extras_from_a_then_b() {
    let fs = MemoryFileSystem::new()
        .with_file("a/a-only", 1, 1)
        .with_file("a/both", 1, 2)
        .with_file("b/both", 1, 1)
        .with_file("b/b-only", 1, 1);
    let plan = MergeEngine::new(&fs).plan(
        &PathItem::root("a"),
        &PathItem::root("b"),
        "d",
        &mut NoopSink,
    );

    assert_eq!(plan.codes(), vec![
        OperationCode::MakeDir,
        OperationCode::NewestFromA,
        OperationCode::CopyFromA,
        OperationCode::CopyFromB,
    ]);
}

#[test]
fn failed_operation_does_not_stop_later_ones() {
    let fs = MemoryFileSystem::new()
        .with_file("a/first", 1, 1)
        .with_file("a/second", 1, 1)
        .with_file("a/third", 1, 1)
        .with_dir("b")
        .fail_copies_from("a/first");

    let run = MergeEngine::new(&fs)
        .run("a", "b", "dest", &mut NoopSink)
        .unwrap();

    let outcomes: Vec<&OperationOutcome> = run
        .plan()
        .iter()
        .map(|operation| operation.outcome().expect("executed"))
        .collect();
    assert!(matches!(outcomes[0], OperationOutcome::Completed));
    assert!(matches!(
        outcomes[1],
        OperationOutcome::Failed(FsError::Injected { .. })
    ));
    assert!(matches!(outcomes[2], OperationOutcome::Completed));
    assert!(matches!(outcomes[3], OperationOutcome::Completed));
    assert_eq!(run.summary().unwrap().failed(), 1);
    assert!(fs.is_file(Path::new("dest/third")));
}

#[test]
fn conflict_does_not_disturb_siblings() {
    let fs = MemoryFileSystem::new()
        .with_file("a/clash/inner", 1, 1)
        .with_file("b/clash", 1, 1)
        .with_file("a/left", 1, 1)
        .with_file("b/right", 1, 1)
        .with_file("a/shared", 1, 1)
        .with_file("b/shared", 1, 3);

    let run = MergeEngine::new(&fs)
        .run("a", "b", "dest", &mut NoopSink)
        .unwrap();

    let summary = run.summary().unwrap();
    assert_eq!(summary.warned(), 1);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.completed(), 4);
    assert!(fs.is_file(Path::new("dest/left")));
    assert!(fs.is_file(Path::new("dest/right")));
    assert!(fs.is_file(Path::new("dest/shared")));
    assert!(!fs.exists(Path::new("dest/clash")));
}

#[test]
fn sink_missing_a_category_fails_before_any_mutation() {
    let fs = MemoryFileSystem::new().with_file("a/x", 1, 1).with_dir("b");
    let mut sink = LogRouter::new()
        .register(LogCategory::General, true)
        .register(LogCategory::Conflict, true);

    let error = MergeEngine::new(&fs)
        .run("a", "b", "dest", &mut sink)
        .unwrap_err();

    assert!(matches!(error, MergeError::Logging(_)));
    assert_eq!(
        error.to_string(),
        "log sink is missing required categories: copy"
    );
    assert!(!fs.exists(Path::new("dest")));
}

#[test]
fn caller_exclusions_are_counted_and_logged() {
    let fs = MemoryFileSystem::new()
        .with_file("a/sub/x", 1, 1)
        .with_file("b/sub/y", 1, 1);
    let printer = MemoryPrinter::new();
    let mut sink = LogRouter::for_verbosity(1).with_printer(printer.clone());

    let run = MergeEngine::new(&fs)
        .with_options(plan_only().exclude(OperationCode::MakeDir))
        .run("a", "b", "dest", &mut sink)
        .unwrap();

    assert_eq!(run.planned(), 4);
    assert_eq!(run.excluded(), 2);
    assert!(run.summary().is_none());
    assert!(
        printer
            .lines()
            .contains(&"Planned 4 operations, excluded 2".to_owned())
    );
}

#[test]
fn comparison_trace_is_logged_when_requested() {
    let fs = MemoryFileSystem::new()
        .with_file("a/f", 1, 1)
        .with_file("b/f", 1, 1);
    let printer = MemoryPrinter::new();
    let mut sink = LogRouter::new()
        .with_printer(printer.clone())
        .show_category(true)
        .register(LogCategory::General, false)
        .register(LogCategory::Copy, false)
        .register(LogCategory::Conflict, true)
        .register(LogCategory::Compare, true);

    MergeEngine::new(&fs)
        .with_options(plan_only().trace_comparisons(true))
        .run("a", "b", "dest", &mut sink)
        .unwrap();

    assert_eq!(printer.lines(), vec![
        "(compare) \"\": both directories, 1 distinct entries".to_owned(),
        "(compare) \"f\": both files, newest-from-b".to_owned(),
    ]);
}

#[test]
fn dry_run_executes_without_mutating() {
    let inner = MemoryFileSystem::new()
        .with_file("a/x", 1, 1)
        .with_dir("b");
    let dry = DryRunFileSystem::new(&inner);

    let run = MergeEngine::new(&dry)
        .run("a", "b", "dest", &mut NoopSink)
        .unwrap();

    assert_eq!(run.summary().unwrap().completed(), 2);
    assert_eq!(dry.recorded(), vec![
        DryRunMutation::MakeDirectory(PathBuf::from("dest")),
        DryRunMutation::Copy {
            source: PathBuf::from("a/x"),
            destination: PathBuf::from("dest/x"),
        },
    ]);
    assert!(!inner.exists(Path::new("dest")));
}
