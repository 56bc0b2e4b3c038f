use super::*;
use std::fs;
use std::path::PathBuf;

fn collect_relative_paths(walker: TreeWalker) -> Vec<PathBuf> {
    walker
        .map(|entry| entry.expect("walker entry").relative_path().to_path_buf())
        .collect()
}

#[test]
fn walk_errors_when_root_missing() {
    let error = TreeWalkBuilder::new("/nonexistent/path/for/walker")
        .build()
        .unwrap_err();
    assert!(matches!(error, FsError::Io { .. }));
    assert_eq!(error.path(), std::path::Path::new("/nonexistent/path/for/walker"));
}

#[test]
fn walk_of_single_file_is_empty() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("file.txt");
    fs::write(&file, b"contents").expect("write");

    let mut walker = TreeWalkBuilder::new(&file).build().expect("build walker");
    assert!(walker.next().is_none());
}

#[test]
fn walk_directory_yields_deterministic_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(root.join("b")).expect("dir b");
    fs::create_dir(root.join("a")).expect("dir a");
    fs::write(root.join("a/inner.txt"), b"data").expect("write inner");
    fs::write(root.join("c.txt"), b"data").expect("write file");

    let walker = TreeWalkBuilder::new(&root).build().expect("build walker");
    assert_eq!(collect_relative_paths(walker), vec![
        PathBuf::from("a"),
        PathBuf::from("a/inner.txt"),
        PathBuf::from("b"),
        PathBuf::from("c.txt"),
    ]);
}

#[test]
fn walk_reports_depth_below_root() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("x/y")).expect("create nested");

    let depths: Vec<usize> = TreeWalkBuilder::new(temp.path())
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("entry").depth())
        .collect();
    assert_eq!(depths, vec![1, 2]);
}

#[test]
fn tree_size_sums_nested_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("d/e")).expect("create nested");
    fs::write(temp.path().join("d/one"), [0u8; 10]).expect("write one");
    fs::write(temp.path().join("d/e/two"), [0u8; 32]).expect("write two");

    assert_eq!(tree_size(&temp.path().join("d")).expect("size"), 42);
    assert_eq!(tree_size(&temp.path().join("d/one")).expect("size"), 10);
}

#[cfg(unix)]
#[test]
fn walk_does_not_follow_symlink_by_default() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let target = temp.path().join("target");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("inner.txt"), b"data").expect("write inner");
    symlink(&target, root.join("link")).expect("create symlink");

    let walker = TreeWalkBuilder::new(&root).build().expect("build walker");
    assert_eq!(collect_relative_paths(walker), vec![PathBuf::from("link")]);
}

#[cfg(unix)]
#[test]
fn walk_follows_symlink_when_enabled() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let target = temp.path().join("target");
    fs::create_dir(&root).expect("create root");
    fs::create_dir(&target).expect("create target");
    fs::write(target.join("inner.txt"), b"data").expect("write inner");
    symlink(&target, root.join("link")).expect("create symlink");

    let walker = TreeWalkBuilder::new(&root)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    assert_eq!(collect_relative_paths(walker), vec![
        PathBuf::from("link"),
        PathBuf::from("link/inner.txt")
    ]);
}

#[cfg(unix)]
#[test]
fn walk_detects_symlink_cycles() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir(&root).expect("create root");
    symlink(&root, root.join("self")).expect("create symlink");

    let walker = TreeWalkBuilder::new(&root)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    assert_eq!(collect_relative_paths(walker), vec![PathBuf::from("self")]);
}

#[cfg(unix)]
#[test]
fn walk_enters_directory_again_after_symlinked_sibling() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir_all(root.join("real")).expect("create real");
    fs::write(root.join("real/data.txt"), b"data").expect("write data");
    symlink(root.join("real"), root.join("link")).expect("create symlink");

    let walker = TreeWalkBuilder::new(&root)
        .follow_symlinks(true)
        .build()
        .expect("build walker");
    assert_eq!(collect_relative_paths(walker), vec![
        PathBuf::from("link"),
        PathBuf::from("link/data.txt"),
        PathBuf::from("real"),
        PathBuf::from("real/data.txt"),
    ]);
}
