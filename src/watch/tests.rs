//! Tests for the debounce state machine and the watch loop.

use super::*;
use crate::test_support::write_file;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tempfile::TempDir;

const WINDOW: Duration = Duration::from_millis(1000);

fn debouncer() -> Debouncer {
    Debouncer::new("doc.md", WINDOW)
}

#[test]
fn test_starts_idle() {
    let d = debouncer();
    assert_eq!(d.state(), DebounceState::Idle);
    assert_eq!(d.remaining(Instant::now()), None);
}

#[test]
fn test_target_change_runs_after_window() {
    let mut d = debouncer();
    let t0 = Instant::now();

    d.observe(Path::new("/docs/doc.md"), t0);
    assert!(matches!(d.state(), DebounceState::CollectingBurst { .. }));
    assert!(!d.poll(t0 + Duration::from_millis(999)));
    assert!(d.poll(t0 + WINDOW));
    assert_eq!(d.state(), DebounceState::Idle);
}

#[test]
fn test_burst_triggers_single_run() {
    let mut d = debouncer();
    let t0 = Instant::now();

    for ms in [0, 100, 200, 300] {
        d.observe(Path::new("doc.md"), t0 + Duration::from_millis(ms));
    }

    // Each event restarts the window.
    assert!(!d.poll(t0 + WINDOW));
    assert!(d.poll(t0 + Duration::from_millis(1300)));
    assert!(!d.poll(t0 + Duration::from_millis(5000)));
}

#[test]
fn test_other_files_do_not_trigger() {
    let mut d = debouncer();
    let t0 = Instant::now();

    d.observe(Path::new("/docs/other.md"), t0);
    d.observe(Path::new("/docs/.doc.md.swp"), t0);
    assert!(!d.poll(t0 + WINDOW));
    assert_eq!(d.state(), DebounceState::Idle);
}

#[test]
fn test_target_anywhere_in_burst_triggers() {
    let mut d = debouncer();
    let t0 = Instant::now();

    d.observe(Path::new("/docs/doc.md.tmp"), t0);
    d.observe(Path::new("/docs/doc.md"), t0 + Duration::from_millis(10));
    d.observe(Path::new("/docs/other.md"), t0 + Duration::from_millis(20));
    assert!(d.poll(t0 + Duration::from_millis(1020)));
}

#[test]
fn test_remaining_counts_down() {
    let mut d = debouncer();
    let t0 = Instant::now();

    d.observe(Path::new("doc.md"), t0);
    assert_eq!(
        d.remaining(t0 + Duration::from_millis(400)),
        Some(Duration::from_millis(600))
    );
    assert_eq!(d.remaining(t0 + Duration::from_secs(2)), Some(Duration::ZERO));
}

#[test]
fn test_events_during_run_start_next_burst() {
    let mut d = debouncer();
    let t0 = Instant::now();

    d.observe(Path::new("doc.md"), t0);
    assert!(d.poll(t0 + WINDOW));
    d.begin_run();

    d.observe(Path::new("doc.md"), t0 + Duration::from_millis(1500));
    assert_eq!(d.state(), DebounceState::Running { events_queued: true });
    // A run is never pre-empted.
    assert!(!d.poll(t0 + Duration::from_secs(10)));

    let finished = t0 + Duration::from_secs(3);
    d.end_run(finished);
    assert!(matches!(d.state(), DebounceState::CollectingBurst { .. }));
    assert!(!d.poll(finished));
    assert!(d.poll(finished + WINDOW));
}

#[test]
fn test_quiet_run_returns_to_idle() {
    let mut d = debouncer();
    let t0 = Instant::now();

    d.observe(Path::new("doc.md"), t0);
    assert!(d.poll(t0 + WINDOW));
    d.begin_run();
    d.end_run(t0 + Duration::from_secs(2));
    assert_eq!(d.state(), DebounceState::Idle);
}

#[test]
fn test_content_change_kinds() {
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};

    assert!(is_content_change(&EventKind::Create(CreateKind::File)));
    assert!(is_content_change(&EventKind::Modify(ModifyKind::Data(DataChange::Content))));
    assert!(is_content_change(&EventKind::Modify(ModifyKind::Any)));
    assert!(!is_content_change(&EventKind::Access(AccessKind::Any)));
    assert!(!is_content_change(&EventKind::Remove(RemoveKind::File)));
}

#[test]
fn test_watch_target_uses_parent_directory() {
    let (dir, name) = watch_target(Path::new("/docs/guide.md")).unwrap();
    assert_eq!(dir, PathBuf::from("/docs"));
    assert_eq!(name, "guide.md");

    let (dir, name) = watch_target(Path::new("guide.md")).unwrap();
    assert_eq!(dir, PathBuf::from("."));
    assert_eq!(name, "guide.md");

    assert!(watch_target(Path::new("/")).is_err());
}

#[test]
fn test_watch_runs_once_then_stops_on_cancel() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "doc.md", "```sh\necho hi\n```\n");
    let cancel = CancelToken::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let handle = {
        let cancel = cancel.clone();
        let runs = Arc::clone(&runs);
        thread::spawn(move || {
            watch_file(&path, WINDOW, &cancel, || {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
    };

    thread::sleep(Duration::from_millis(300));
    cancel.cancel();
    handle.join().unwrap().unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_watch_continues_after_failed_run() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "doc.md", "");
    let cancel = CancelToken::new();
    cancel.cancel();

    // The initial run fails; the error is reported, not returned.
    let result = watch_file(&path, WINDOW, &cancel, || {
        Err(RunblockError::UserError("boom".to_string()))
    });
    assert!(result.is_ok());
}

#[test]
fn test_run_interrupted_by_cancel_stops_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "doc.md", "```sh\nsleep 10\n```\n");
    let cancel = CancelToken::new();
    let runs = AtomicUsize::new(0);

    // The run sees the interrupt mid-flight, as the runner does when a
    // signal fires the token.
    let result = watch_file(&path, WINDOW, &cancel, || {
        runs.fetch_add(1, Ordering::SeqCst);
        cancel.cancel();
        Err(RunblockError::Cancelled)
    });

    assert!(result.is_ok());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
