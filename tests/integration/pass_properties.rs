//! Properties that hold across consecutive passes

use crate::integration::test_utils::{roots, sync, tree_contents, write};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use treemirror::{ActionKind, MemorySink};

fn populate(root: &std::path::Path) {
    write(root, "a.txt", "alpha");
    write(root, "b/c.txt", "charlie");
    write(root, "b/d/e.txt", "echo");
    fs::create_dir_all(root.join("empty")).unwrap();
}

/// A second pass over an unchanged source applies nothing
#[test]
fn test_second_pass_is_empty() {
    let roots = roots();
    populate(&roots.source);
    write(&roots.replica, "stale.txt", "stale");

    let first = sync(&roots, &MemorySink::new());
    assert!(!first.actions.is_empty());

    let sink = MemorySink::new();
    let second = sync(&roots, &sink);
    assert!(second.is_clean());
    assert!(second.actions.is_empty());
    assert!(sink.events().is_empty());
}

/// One changed byte yields exactly one Update, even with size and mtime preserved
#[test]
fn test_single_byte_change_is_detected() {
    let roots = roots();
    populate(&roots.source);
    sync(&roots, &MemorySink::new());

    let target = roots.source.join("b/d/e.txt");
    let mtime = FileTime::from_last_modification_time(&fs::metadata(&target).unwrap());
    fs::write(&target, "ecHo").unwrap();
    set_file_mtime(&target, mtime).unwrap();

    let report = sync(&roots, &MemorySink::new());
    assert_eq!(report.actions.len(), 1);
    assert_eq!(report.count(ActionKind::Update), 1);
    assert_eq!(report.actions[0].replica_path(), roots.replica.join("b/d/e.txt"));
    assert_eq!(fs::read_to_string(roots.replica.join("b/d/e.txt")).unwrap(), "ecHo");
}

/// Replica edits are overwritten; the source is never modified
#[test]
fn test_source_is_never_modified() {
    let roots = roots();
    populate(&roots.source);
    let before = tree_contents(&roots.source);

    sync(&roots, &MemorySink::new());
    write(&roots.replica, "a.txt", "tampered");
    write(&roots.replica, "b/extra.txt", "extra");
    fs::remove_dir_all(roots.replica.join("b/d")).unwrap();
    let report = sync(&roots, &MemorySink::new());

    assert!(report.errors.is_empty());
    assert_eq!(tree_contents(&roots.source), before);
    assert_eq!(tree_contents(&roots.replica), before);
}

/// Copies carry the source modification time
#[test]
fn test_copy_preserves_modification_time() {
    let roots = roots();
    write(&roots.source, "old.txt", "old");
    let past = FileTime::from_unix_time(1_500_000_000, 0);
    set_file_mtime(roots.source.join("old.txt"), past).unwrap();

    sync(&roots, &MemorySink::new());

    let copied = fs::metadata(roots.replica.join("old.txt")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&copied), past);
}

/// Identical content with different timestamps is left alone
#[test]
fn test_timestamp_only_difference_is_not_an_update() {
    let roots = roots();
    write(&roots.source, "same.txt", "same");
    write(&roots.replica, "same.txt", "same");
    set_file_mtime(
        roots.replica.join("same.txt"),
        FileTime::from_unix_time(1_000_000_000, 0),
    )
    .unwrap();

    let report = sync(&roots, &MemorySink::new());
    assert!(report.actions.is_empty());
}
