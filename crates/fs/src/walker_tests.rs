use super::*;

use crate::{EntryKind, FileAttributes, StdFileSystem};
use crossbeam::channel;
use std::{
    collections::{HashMap, HashSet},
    fs::{create_dir, write},
    path::PathBuf,
    time::{Duration, SystemTime},
};

/// In-memory tree with per-path failure injection.
#[derive(Default)]
struct FakeFs {
    dirs: HashMap<PathBuf, Vec<PathBuf>>,
    files: HashSet<PathBuf>,
    attr_errors: HashMap<PathBuf, ErrorKind>,
    list_errors: HashMap<PathBuf, ErrorKind>,
}

impl FakeFs {
    fn dir(mut self, path: &str, children: &[&str]) -> Self {
        let path = PathBuf::from(path);
        let children = children.iter().map(|c| path.join(c)).collect();
        self.dirs.insert(path, children);
        self
    }

    fn file(mut self, path: &str) -> Self {
        self.files.insert(PathBuf::from(path));
        self
    }

    fn fail_attributes(mut self, path: &str, kind: ErrorKind) -> Self {
        self.attr_errors.insert(PathBuf::from(path), kind);
        self
    }

    fn fail_listing(mut self, path: &str, kind: ErrorKind) -> Self {
        self.list_errors.insert(PathBuf::from(path), kind);
        self
    }
}

fn attrs(is_directory: bool) -> FileAttributes {
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
    FileAttributes {
        is_directory,
        last_modified: t,
        created: t,
    }
}

impl FileSystem for FakeFs {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        if let Some(kind) = self.list_errors.get(dir) {
            return Err(io::Error::from(*kind));
        }
        self.dirs
            .get(dir)
            .cloned()
            .ok_or_else(|| io::Error::from(ErrorKind::NotFound))
    }

    fn attributes(&self, path: &Path) -> io::Result<FileAttributes> {
        if let Some(kind) = self.attr_errors.get(path) {
            return Err(io::Error::from(*kind));
        }
        if self.dirs.contains_key(path) {
            Ok(attrs(true))
        } else if self.files.contains(path) {
            Ok(attrs(false))
        } else {
            Err(io::Error::from(ErrorKind::NotFound))
        }
    }
}

fn run(
    fs: &dyn FileSystem,
    pattern: &str,
    root: &str,
) -> (Result<WalkOutcome, WalkError>, Vec<(PathBuf, EntryKind)>) {
    let matcher = PatternMatcher::parse(pattern).expect("compile matcher");
    let cancel = CancelToken::new();
    let mut events = Vec::new();

    let result = TreeWalker::new(fs, &matcher, &cancel).walk(Path::new(root), |ev| {
        events.push((ev.path().to_path_buf(), ev.kind()))
    });

    (result, events)
}

fn sample_tree() -> FakeFs {
    // /r
    //   a.java
    //   sub/
    //     b.java
    //     deeper/
    //       c.java
    //   z.txt
    FakeFs::default()
        .dir("/r", &["a.java", "sub", "z.txt"])
        .file("/r/a.java")
        .dir("/r/sub", &["b.java", "deeper"])
        .file("/r/sub/b.java")
        .dir("/r/sub/deeper", &["c.java"])
        .file("/r/sub/deeper/c.java")
        .file("/r/z.txt")
}

#[test]
fn directories_are_reported_before_their_children() {
    let fs = sample_tree();
    let (result, events) = run(&fs, "*.java", "/r");

    assert!(matches!(result, Ok(WalkOutcome::Completed(_))));

    let expected = vec![
        (PathBuf::from("/r"), EntryKind::Directory),
        (PathBuf::from("/r/a.java"), EntryKind::File),
        (PathBuf::from("/r/sub"), EntryKind::Directory),
        (PathBuf::from("/r/sub/b.java"), EntryKind::File),
        (PathBuf::from("/r/sub/deeper"), EntryKind::Directory),
        (PathBuf::from("/r/sub/deeper/c.java"), EntryKind::File),
    ];
    assert_eq!(events, expected);
}

#[test]
fn stats_count_every_kind_of_entry() {
    let fs = sample_tree().fail_attributes("/r/sub/b.java", ErrorKind::PermissionDenied);
    let (result, _) = run(&fs, "java", "/r");

    let stats = match result {
        Ok(WalkOutcome::Completed(stats)) => stats,
        other => panic!("unexpected walk result: {other:?}"),
    };

    assert_eq!(
        stats,
        WalkStats {
            directories: 3,
            files: 2,
            skipped: 1,
            inaccessible: 1,
        }
    );
}

#[test]
fn directories_are_never_filtered_by_the_pattern() {
    let fs = FakeFs::default()
        .dir("/r", &["src.d"])
        .dir("/r/src.d", &["x.rs"])
        .file("/r/src.d/x.rs");

    let (_, events) = run(&fs, "md", "/r");

    assert_eq!(
        events,
        vec![
            (PathBuf::from("/r"), EntryKind::Directory),
            (PathBuf::from("/r/src.d"), EntryKind::Directory),
        ]
    );
}

#[test]
fn permission_denied_file_is_reported_and_siblings_still_visited() {
    let fs = sample_tree().fail_attributes("/r/a.java", ErrorKind::PermissionDenied);
    let (result, events) = run(&fs, "*.java", "/r");

    assert!(matches!(result, Ok(WalkOutcome::Completed(_))));
    assert_eq!(events[1], (PathBuf::from("/r/a.java"), EntryKind::Inaccessible));
    assert!(
        events.contains(&(PathBuf::from("/r/sub/deeper/c.java"), EntryKind::File)),
        "walk should continue past the denied entry: {events:?}"
    );
}

#[test]
fn unreadable_directory_yields_one_inaccessible_event() {
    let fs = sample_tree().fail_listing("/r/sub", ErrorKind::PermissionDenied);
    let (result, events) = run(&fs, "*.java", "/r");

    assert!(matches!(result, Ok(WalkOutcome::Completed(_))));
    assert_eq!(
        events,
        vec![
            (PathBuf::from("/r"), EntryKind::Directory),
            (PathBuf::from("/r/a.java"), EntryKind::File),
            (PathBuf::from("/r/sub"), EntryKind::Inaccessible),
        ]
    );
}

#[test]
fn other_io_errors_abort_the_walk() {
    let fs = sample_tree().fail_attributes("/r/sub/b.java", ErrorKind::Other);
    let (result, events) = run(&fs, "*.java", "/r");

    let err = result.expect_err("walk should abort");
    assert_eq!(err.path, PathBuf::from("/r/sub/b.java"));
    assert_eq!(err.source.kind(), ErrorKind::Other);

    // Nothing after the failing entry.
    assert_eq!(
        events.last(),
        Some(&(PathBuf::from("/r/sub"), EntryKind::Directory))
    );
    assert!(!events.iter().any(|(p, _)| p.ends_with("deeper")));
}

#[test]
fn listing_failure_other_than_permission_aborts() {
    let fs = sample_tree().fail_listing("/r/sub", ErrorKind::InvalidData);
    let (result, events) = run(&fs, "*.java", "/r");

    let err = result.expect_err("walk should abort");
    assert_eq!(err.path, PathBuf::from("/r/sub"));
    assert_eq!(events.len(), 2);
}

#[test]
fn denied_root_is_reported_and_walk_completes() {
    let fs = sample_tree().fail_attributes("/r", ErrorKind::PermissionDenied);
    let (result, events) = run(&fs, "*", "/r");

    assert!(matches!(result, Ok(WalkOutcome::Completed(_))));
    assert_eq!(events, vec![(PathBuf::from("/r"), EntryKind::Inaccessible)]);
}

#[test]
fn missing_root_aborts_immediately() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let missing = tmp.path().join("missing");

    let matcher = PatternMatcher::any();
    let cancel = CancelToken::new();
    let mut count = 0;

    let err = TreeWalker::new(&StdFileSystem, &matcher, &cancel)
        .walk(&missing, |_| count += 1)
        .expect_err("missing root should abort");

    assert_eq!(err.path, missing);
    assert_eq!(err.source.kind(), ErrorKind::NotFound);
    assert_eq!(count, 0);
}

#[test]
fn cancelled_token_stops_before_first_entry() {
    let fs = sample_tree();
    let matcher = PatternMatcher::any();
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut count = 0;
    let result = TreeWalker::new(&fs, &matcher, &cancel).walk(Path::new("/r"), |_| count += 1);

    assert!(matches!(result, Ok(WalkOutcome::Cancelled)));
    assert_eq!(count, 0);
}

#[test]
fn cancelling_mid_walk_emits_nothing_further() {
    let fs = sample_tree();
    let matcher = PatternMatcher::any();
    let cancel = CancelToken::new();

    let mut events = Vec::new();
    let result = TreeWalker::new(&fs, &matcher, &cancel).walk(Path::new("/r"), |ev| {
        events.push(ev);
        if events.len() == 2 {
            cancel.cancel();
        }
    });

    assert!(matches!(result, Ok(WalkOutcome::Cancelled)));
    assert_eq!(events.len(), 2);
}

#[test]
fn real_tree_reports_each_matched_file_exactly_once() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path().to_path_buf();

    // root/
    //   a.txt
    //   b.java
    //   sub/
    //     c.java
    //     d.md
    write(root.join("a.txt"), b"a").expect("write a.txt");
    write(root.join("b.java"), b"b").expect("write b.java");
    create_dir(root.join("sub")).expect("create sub");
    write(root.join("sub").join("c.java"), b"c").expect("write c.java");
    write(root.join("sub").join("d.md"), b"d").expect("write d.md");

    let matcher = PatternMatcher::parse("*.java").expect("compile matcher");
    let cancel = CancelToken::new();
    let (tx, rx) = channel::unbounded::<VisitEvent>();

    let outcome = TreeWalker::new(&StdFileSystem, &matcher, &cancel)
        .walk(&root, |ev| {
            let _ = tx.send(ev);
        })
        .expect("walk");
    drop(tx);

    let events: Vec<VisitEvent> = rx.iter().collect();
    assert_eq!(events[0].path(), root.as_path());
    assert_eq!(events[0].kind(), EntryKind::Directory);

    let mut rel_paths: Vec<PathBuf> = events
        .iter()
        .map(|e| e.path().strip_prefix(&root).unwrap().to_path_buf())
        .collect();
    rel_paths.sort();

    let expected = vec![
        PathBuf::from(""),
        PathBuf::from("b.java"),
        PathBuf::from("sub"),
        PathBuf::from("sub/c.java"),
    ];
    assert_eq!(rel_paths, expected);

    for ev in &events {
        assert!(ev.attributes().is_some(), "{:?} should carry attributes", ev.path());
    }

    assert_eq!(
        outcome,
        WalkOutcome::Completed(WalkStats {
            directories: 2,
            files: 2,
            skipped: 2,
            inaccessible: 0,
        })
    );
}
