//! Conditions that abort a pass before anything below the roots is touched

use crate::integration::test_utils::{roots, write};
use std::fs;
use std::path::Path;
use treemirror::{
    synchronize, CancellationToken, LocalFs, MemorySink, SyncError, SyncOptions, SyncReport,
};

fn run(source: &Path, replica: &Path) -> Result<SyncReport, SyncError> {
    synchronize(
        &LocalFs,
        source,
        replica,
        &SyncOptions::default(),
        &MemorySink::new(),
        &CancellationToken::new(),
    )
}

#[test]
fn test_missing_source_root_is_fatal() {
    let roots = roots();
    write(&roots.replica, "keep.txt", "keep");

    let err = run(&roots.base.join("absent"), &roots.replica).unwrap_err();

    assert!(matches!(err, SyncError::RootMissing(_)));
    assert!(err.is_fatal());
    assert!(roots.replica.join("keep.txt").exists());
}

#[test]
fn test_source_file_root_is_fatal() {
    let roots = roots();
    write(&roots.base, "plain.txt", "plain");

    let err = run(&roots.base.join("plain.txt"), &roots.replica).unwrap_err();
    assert!(matches!(err, SyncError::SourceNotDirectory(_)));
}

#[test]
fn test_replica_file_root_is_fatal() {
    let roots = roots();
    write(&roots.source, "a.txt", "a");
    fs::remove_dir(&roots.replica).unwrap();
    fs::write(&roots.replica, "not a dir").unwrap();

    let err = run(&roots.source, &roots.replica).unwrap_err();
    assert!(matches!(err, SyncError::ReplicaNotDirectory(_)));
    assert_eq!(fs::read_to_string(&roots.replica).unwrap(), "not a dir");
}

#[test]
fn test_nested_roots_are_rejected() {
    let roots = roots();
    write(&roots.source, "a.txt", "a");

    let inside = roots.source.join("mirror");
    let err = run(&roots.source, &inside).unwrap_err();
    assert!(matches!(err, SyncError::OverlappingRoots { .. }));
    assert!(!inside.exists());

    let err = run(&roots.source, &roots.source).unwrap_err();
    assert!(matches!(err, SyncError::OverlappingRoots { .. }));

    write(&roots.replica, "outer.txt", "outer");
    fs::create_dir(roots.replica.join("sub")).unwrap();
    let err = run(&roots.replica.join("sub"), &roots.replica).unwrap_err();
    assert!(matches!(err, SyncError::OverlappingRoots { .. }));
    assert!(roots.replica.join("outer.txt").exists());
}

#[test]
fn test_relative_components_are_resolved_before_overlap_check() {
    let roots = roots();
    let sneaky = roots.source.join("..").join("source").join("copy");

    let err = run(&roots.source, &sneaky).unwrap_err();
    assert!(matches!(err, SyncError::OverlappingRoots { .. }));
}

#[test]
fn test_invalid_ignore_pattern_is_fatal() {
    let roots = roots();
    write(&roots.source, "a.txt", "a");

    let options = SyncOptions {
        ignore_patterns: vec!["[oops".to_string()],
        ..SyncOptions::default()
    };
    let err = synchronize(
        &LocalFs,
        &roots.source,
        &roots.replica,
        &options,
        &MemorySink::new(),
        &CancellationToken::new(),
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::InvalidPattern { .. }));
    assert!(err.is_fatal());
    assert!(!roots.replica.join("a.txt").exists());
}
