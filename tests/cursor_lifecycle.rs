//! Handle lifetime checks against a scripted walker that records every
//! fetch and the final release.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsStr;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use dircursor::{dir, DirCursor, DirError, DirSpec, EntryKind, RawEntry, Walker};

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Fetch,
    Close,
}

type Log = Rc<RefCell<Vec<Event>>>;

struct Scripted {
    entries: VecDeque<RawEntry>,
    log:     Log,
}

impl Walker for Scripted {
    fn open(path: &Path) -> Result<Self, DirError> {
        Err(DirError::NotFound(path.to_path_buf()))
    }

    fn fetch_next(&mut self) -> Option<RawEntry> {
        self.log.borrow_mut().push(Event::Fetch);
        self.entries.pop_front()
    }
}

impl Drop for Scripted {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::Close);
    }
}

/// A native listing of `a.txt`, `b.log` and `sub/`, with the pseudo-entries
/// the platform reports first.
fn native_listing() -> (Scripted, Log) {
    let log = Log::default();
    let entries = VecDeque::from(vec![
        RawEntry::new(EntryKind::Other, "."),
        RawEntry::new(EntryKind::Other, ".."),
        RawEntry::new(EntryKind::File, "a.txt"),
        RawEntry::new(EntryKind::File, "b.log"),
        RawEntry::new(EntryKind::Dir, "sub"),
    ]);
    (Scripted { entries, log: Rc::clone(&log) }, log)
}

fn closes(log: &Log) -> usize {
    log.borrow().iter().filter(|e| **e == Event::Close).count()
}

fn fetches(log: &Log) -> usize {
    log.borrow().iter().filter(|e| **e == Event::Fetch).count()
}

/// Close happened once, and nothing was fetched after it.
fn assert_closed_last(log: &Log) {
    assert_eq!(closes(log), 1, "log: {:?}", log.borrow());
    assert_eq!(log.borrow().last(), Some(&Event::Close), "log: {:?}", log.borrow());
}

fn open<'s>(spec: &'s DirSpec, walker: Scripted) -> DirCursor<'s, Scripted> {
    DirCursor::from_walker(spec, Ok(walker))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn full_pull_closes_once_after_last_fetch() {
    let spec = dir("scripted");
    let (walker, log) = native_listing();
    let mut cursor = open(&spec, walker);

    let mut names = Vec::new();
    while let Some(name) = cursor.pull() {
        names.push(name);
    }
    assert_eq!(names, ["a.txt", "b.log", "sub"]);

    // Five entries plus the fetch that reported the end.
    assert_eq!(fetches(&log), 6);
    assert_closed_last(&log);

    drop(cursor);
    assert_closed_last(&log);
}

#[test]
fn files_only_with_predicate() {
    let spec = dir("scripted")
        .files_only(true)
        .filter(|name: &OsStr| name.to_string_lossy().ends_with(".txt"));
    let (walker, log) = native_listing();

    let names: Vec<_> = open(&spec, walker).collect();
    assert_eq!(names, ["a.txt"]);
    assert_closed_last(&log);
}

#[test]
fn construction_locates_first_entry_eagerly() {
    let spec = dir("scripted");
    let (walker, log) = native_listing();
    let cursor = open(&spec, walker);

    // ".", "..", then "a.txt" qualifies.
    assert_eq!(fetches(&log), 3);
    assert_eq!(closes(&log), 0);
    assert_eq!(cursor.peek(), Some(OsStr::new("a.txt")));
    assert!(!cursor.is_exhausted());
}

#[test]
fn abandoned_cursor_closes_once() {
    for taken in 0..3 {
        let spec = dir("scripted");
        let (walker, log) = native_listing();
        let mut cursor = open(&spec, walker);

        for _ in 0..taken {
            assert!(cursor.pull().is_some());
        }
        assert_eq!(closes(&log), 0, "closed before abandonment after {taken} pulls");

        drop(cursor);
        assert_closed_last(&log);
    }
}

#[test]
fn explicit_close_releases_handle() {
    let spec = dir("scripted");
    let (walker, log) = native_listing();
    let mut cursor = open(&spec, walker);

    cursor.pull();
    cursor.close();
    assert_closed_last(&log);
}

#[test]
fn exhausted_cursor_stops_fetching() {
    let spec = dir("scripted");
    let (walker, log) = native_listing();
    let mut cursor = open(&spec, walker);

    while cursor.pull().is_some() {}
    let before = log.borrow().len();
    for _ in 0..5 {
        assert_eq!(cursor.pull(), None);
    }
    assert_eq!(log.borrow().len(), before);
    assert_closed_last(&log);
}

#[test]
fn duration_stops_at_exhaustion() {
    let spec = dir("scripted");
    let (walker, _log) = native_listing();
    let mut cursor = open(&spec, walker);

    while cursor.pull().is_some() {}
    let done = cursor.stats();
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(cursor.stats(), done);
    assert!(done.duration < Duration::from_millis(30), "took {:?}", done.duration);
}

#[test]
fn duration_keeps_running_while_names_remain() {
    let spec = dir("scripted");
    let (walker, _log) = native_listing();
    let cursor = open(&spec, walker);

    let early = cursor.stats().duration;
    std::thread::sleep(Duration::from_millis(5));
    assert!(cursor.stats().duration > early);
}

#[test]
fn all_rejected_closes_during_construction() {
    let spec = dir("scripted").filter(|_: &OsStr| false);
    let (walker, log) = native_listing();
    let cursor = open(&spec, walker);

    assert!(cursor.is_exhausted());
    assert_closed_last(&log);
    assert_eq!(cursor.stats().seen, 5);
    assert_eq!(cursor.stats().accepted, 0);
}

#[test]
fn failed_open_holds_nothing() {
    let spec = dir("scripted");
    let mut cursor = DirCursor::<Scripted>::from_walker(&spec, Err(DirError::NotFound(PathBuf::from("scripted"))));

    assert!(cursor.is_exhausted());
    assert_eq!(cursor.pull(), None);
    assert!(cursor.open_error().unwrap().is_missing());

    // Walker::open on the double always fails.
    assert_eq!(spec.cursor_with::<Scripted>().count(), 0);
}

#[test]
fn callback_error_propagates_after_release() {
    let spec = dir("scripted");
    let (walker, log) = native_listing();
    let cursor = open(&spec, walker);

    let seen_log = Rc::clone(&log);
    let result = cursor.consume(|name| {
        assert_eq!(closes(&seen_log), 0, "released while the callback still runs");
        if name == "b.log" {
            Err("stop")
        } else {
            Ok(())
        }
    });

    assert_eq!(result, Err("stop"));
    assert_closed_last(&log);
}

#[test]
fn callback_panic_still_releases() {
    let spec = dir("scripted");
    let (walker, log) = native_listing();
    let cursor = open(&spec, walker);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        cursor.consume(|_| -> Result<(), ()> { panic!("callback failed") })
    }));

    assert!(outcome.is_err());
    assert_closed_last(&log);
}

#[test]
fn filter_panic_during_advance_releases_once() {
    let spec = dir("scripted").filter(|name: &OsStr| {
        assert!(name != "b.log", "filter failed");
        true
    });
    let (walker, log) = native_listing();
    let mut cursor = open(&spec, walker);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| cursor.pull()));
    assert!(outcome.is_err());
    assert_closed_last(&log);

    assert!(cursor.is_exhausted());
    assert_eq!(cursor.pull(), None);
    drop(cursor);
    assert_closed_last(&log);
}

#[test]
fn entry_filter_rules() {
    let file = RawEntry::new(EntryKind::File, "a.txt");
    let sub  = RawEntry::new(EntryKind::Dir, "sub");
    let dot  = RawEntry::new(EntryKind::Other, ".");

    let everything = dir("x");
    assert!(everything.accepts(&file));
    assert!(everything.accepts(&sub));
    assert!(!everything.accepts(&dot));
    assert!(!dot.is_candidate());

    let files = dir("x").files_only(true);
    assert!(files.accepts(&file));
    assert!(!files.accepts(&sub));

    let logs = dir("x").extension("log");
    assert!(!logs.accepts(&file));
    assert!(!logs.accepts(&sub));
}

#[test]
fn directory_glob_checks_kind() {
    let sub_dir  = RawEntry::new(EntryKind::Dir, "sub");
    let sub_file = RawEntry::new(EntryKind::File, "sub");

    let dirs = dir("x").glob(["sub/"]).unwrap();
    assert!(dirs.accepts(&sub_dir));
    assert!(!dirs.accepts(&sub_file));

    let no_dirs = dir("x").glob(["!sub/"]).unwrap();
    assert!(!no_dirs.accepts(&sub_dir));
    assert!(no_dirs.accepts(&sub_file));
}
