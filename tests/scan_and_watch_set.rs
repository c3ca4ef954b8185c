// tests/scan_and_watch_set.rs

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;

use relaunch::errors::RelaunchError;
use relaunch::fs::mock::MockFileSystem;
use relaunch::fs::RealFileSystem;
use relaunch::types::WatchSetPolicy;
use relaunch::watch::{scan, SourceMatcher, WatchSet};
use relaunch_test_utils::fake_notifier::RecordingNotifier;

fn rs_matcher() -> SourceMatcher {
    SourceMatcher::new(&["rs".to_string()], &[]).expect("matcher")
}

fn write(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, "// source").unwrap();
    path
}

#[test]
fn real_tree_registers_only_matching_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let expected: BTreeSet<PathBuf> = [
        write(root, "main.rs"),
        write(root, "engine/core.rs"),
        write(root, "engine/deep/nested/leaf.rs"),
    ]
    .into_iter()
    .collect();
    write(root, "README.md");
    write(root, "engine/notes.txt");
    write(root, "engine/main.rs.bak");
    fs::create_dir_all(root.join("empty.rs")).unwrap();

    let notifier = RecordingNotifier::new();
    let mut set = WatchSet::new(notifier.clone(), WatchSetPolicy::AddOnly);
    let report = set
        .populate(&RealFileSystem, root, &rs_matcher())
        .expect("scan");

    assert_eq!(report.total, 3);
    let watched: BTreeSet<PathBuf> = notifier.watched().into_iter().collect();
    assert_eq!(watched, expected);
    // A directory named like a source file is never registered.
    assert!(!set.contains(&root.join("empty.rs")));
}

#[test]
fn repeated_scans_report_each_file_once_and_refresh_watches() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.rs");

    let notifier = RecordingNotifier::new();
    let mut set = WatchSet::new(notifier.clone(), WatchSetPolicy::AddOnly);
    let matcher = rs_matcher();

    set.populate(&RealFileSystem, root, &matcher).unwrap();
    write(root, "b.rs");
    let second = set.populate(&RealFileSystem, root, &matcher).unwrap();
    let third = set.populate(&RealFileSystem, root, &matcher).unwrap();

    assert_eq!(second.added, vec![root.join("b.rs")]);
    assert!(third.added.is_empty());
    assert_eq!(third.total, 2);
    // a.rs: 3 scans, b.rs: 2 scans.
    assert_eq!(notifier.watched().len(), 5);
}

#[test]
fn add_only_keeps_deleted_files_and_prune_drops_them() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/keep.rs", "");
    fs.add_file("/proj/gone.rs", "");
    let matcher = rs_matcher();

    let add_only = RecordingNotifier::new();
    let mut add_only_set = WatchSet::new(add_only.clone(), WatchSetPolicy::AddOnly);
    let prune = RecordingNotifier::new();
    let mut prune_set = WatchSet::new(prune.clone(), WatchSetPolicy::Prune);

    add_only_set.populate(&fs, Path::new("/proj"), &matcher).unwrap();
    prune_set.populate(&fs, Path::new("/proj"), &matcher).unwrap();

    fs.remove("/proj/gone.rs");

    let report = add_only_set.populate(&fs, Path::new("/proj"), &matcher).unwrap();
    assert_eq!(report.total, 2);
    assert!(add_only.unwatched().is_empty());

    let report = prune_set.populate(&fs, Path::new("/proj"), &matcher).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.removed, vec![PathBuf::from("/proj/gone.rs")]);
    assert_eq!(prune.unwatched(), vec![PathBuf::from("/proj/gone.rs")]);
}

#[test]
fn unreadable_directory_fails_the_whole_scan() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/ok.rs", "");
    fs.add_file("/proj/private/secret.rs", "");
    fs.deny("/proj/private");

    let notifier = RecordingNotifier::new();
    let mut set = WatchSet::new(notifier.clone(), WatchSetPolicy::AddOnly);
    let err = set
        .populate(&fs, Path::new("/proj"), &rs_matcher())
        .unwrap_err();

    assert!(matches!(err, RelaunchError::WalkError { .. }));
    // Nothing from a failed walk is registered.
    assert!(notifier.watched().is_empty());
}

#[test]
fn excluded_directories_are_not_walked() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/lib.rs", "");
    fs.add_file("/proj/target/debug/build.rs", "");
    let matcher = SourceMatcher::new(&["rs".to_string()], &["target".to_string()]).unwrap();

    let found = scan(&fs, Path::new("/proj"), &matcher).unwrap();
    assert_eq!(
        found.into_iter().collect::<Vec<_>>(),
        vec![PathBuf::from("/proj/src/lib.rs")]
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn scan_finds_exactly_the_matching_files(
        files in proptest::collection::btree_set(
            ("[a-c]{1,2}", proptest::collection::vec("[a-c]{1,2}", 0..3), prop_oneof!["rs", "md", "txt"]),
            0..12,
        )
    ) {
        let fs = MockFileSystem::new();
        fs.add_dir("/proj");

        let mut expected = BTreeSet::new();
        for (stem, dirs, ext) in &files {
            let mut path = PathBuf::from("/proj");
            for d in dirs {
                // `d_` keeps directory names apart from file names.
                path.push(format!("d_{d}"));
            }
            path.push(format!("{stem}.{ext}"));
            fs.add_file(&path, "");
            if ext == "rs" {
                expected.insert(path);
            }
        }

        let found = scan(&fs, Path::new("/proj"), &rs_matcher()).unwrap();
        prop_assert_eq!(found, expected);
    }
}
