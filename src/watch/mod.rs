//! Watch mode: re-run a document's blocks whenever the file changes.
//!
//! Editors save files in different ways (write in place, write a temp file
//! and rename, truncate then write), so the watcher observes the file's
//! parent directory and matches events by file name. Events are batched:
//! a run starts only after a quiet window with no further events, and only
//! if the target file was among the paths touched during that burst.
//!
//! The debounce logic is the pure [`Debouncer`] state machine; [`watch_file`]
//! feeds it from `notify`.

use crate::error::{Result, RunblockError};
use crate::runner::CancelToken;
use chrono::Local;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Upper bound on how long the loop blocks before rechecking cancellation.
const IDLE_TICK: Duration = Duration::from_millis(100);

#[cfg(test)]
mod tests;

/// Where the debouncer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No pending events.
    Idle,
    /// Events seen; waiting for the quiet window to pass.
    CollectingBurst { deadline: Instant },
    /// A run is in progress. Events seen now start the next burst once it
    /// finishes.
    Running { events_queued: bool },
}

/// Batches change notifications into at most one run per quiet window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    target: OsString,
    window: Duration,
    state: DebounceState,
    target_touched: bool,
}

impl Debouncer {
    /// `target` is the watched file's name within its directory.
    pub fn new(target: impl Into<OsString>, window: Duration) -> Self {
        Self {
            target: target.into(),
            window,
            state: DebounceState::Idle,
            target_touched: false,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Record a create/modify event for `path`. Every event restarts the
    /// quiet window.
    pub fn observe(&mut self, path: &Path, now: Instant) {
        if path.file_name() == Some(self.target.as_os_str()) {
            self.target_touched = true;
        }

        self.state = match self.state {
            DebounceState::Idle | DebounceState::CollectingBurst { .. } => {
                DebounceState::CollectingBurst {
                    deadline: now + self.window,
                }
            }
            DebounceState::Running { .. } => DebounceState::Running {
                events_queued: true,
            },
        };
    }

    /// Check whether the quiet window has elapsed. Returns `true` when a run
    /// should start, i.e. the window passed and the target was touched.
    pub fn poll(&mut self, now: Instant) -> bool {
        let DebounceState::CollectingBurst { deadline } = self.state else {
            return false;
        };
        if now < deadline {
            return false;
        }

        self.state = DebounceState::Idle;
        std::mem::take(&mut self.target_touched)
    }

    /// Time left before the current burst's window elapses.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.state {
            DebounceState::CollectingBurst { deadline } => {
                Some(deadline.saturating_duration_since(now))
            }
            _ => None,
        }
    }

    pub fn begin_run(&mut self) {
        self.state = DebounceState::Running {
            events_queued: false,
        };
    }

    /// Finish a run. Events that arrived during it open a new burst.
    pub fn end_run(&mut self, now: Instant) {
        self.state = match self.state {
            DebounceState::Running {
                events_queued: true,
            } => DebounceState::CollectingBurst {
                deadline: now + self.window,
            },
            _ => DebounceState::Idle,
        };
    }
}

/// Whether an event kind can mean the file's content changed.
fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Any)
    )
}

fn status(message: &str) {
    eprintln!("[{}] {}", Local::now().format("%H:%M:%S"), message);
}

/// Print a failed run. A run cut short by cancellation is not a failure.
fn report(result: Result<()>, cancel: &CancelToken) {
    match result {
        Err(e) if !cancel.is_cancelled() => eprintln!("Error: {}", e),
        Err(e) => debug!(error = %e, "run interrupted"),
        Ok(()) => {}
    }
}

/// The directory to watch for `path` and the file name to match in it.
fn watch_target(path: &Path) -> Result<(PathBuf, &OsStr)> {
    let name = path.file_name().ok_or_else(|| {
        RunblockError::UserError(format!("cannot watch '{}': not a file path", path.display()))
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name))
}

/// Run `on_change` once, then again after every debounced change to `path`.
///
/// Errors from `on_change` are printed and the loop continues. Returns `Ok`
/// when `cancel` fires or the watcher shuts down.
pub fn watch_file<F>(path: &Path, window: Duration, cancel: &CancelToken, mut on_change: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let (dir, name) = watch_target(path)?;

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx)
        .map_err(|e| RunblockError::Watch(format!("failed to create watcher: {}", e)))?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| {
            RunblockError::Watch(format!("failed to watch '{}': {}", dir.display(), e))
        })?;

    status(&format!("Watching {} for changes...", path.display()));
    report(on_change(), cancel);

    let mut debouncer = Debouncer::new(name, window);
    while !cancel.is_cancelled() {
        let timeout = debouncer
            .remaining(Instant::now())
            .map_or(IDLE_TICK, |left| left.min(IDLE_TICK));

        match rx.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                if is_content_change(&event.kind) {
                    let now = Instant::now();
                    for changed in &event.paths {
                        debug!(path = %changed.display(), kind = ?event.kind, "change observed");
                        debouncer.observe(changed, now);
                    }
                }
            }
            Ok(Err(e)) => warn!(error = %e, "watcher error"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("watcher channel closed");
                break;
            }
        }

        if debouncer.poll(Instant::now()) {
            status("File changed, re-running...");
            debouncer.begin_run();
            report(on_change(), cancel);
            debouncer.end_run(Instant::now());
        }
    }

    if cancel.is_cancelled() {
        status("Stopping watch...");
    }
    Ok(())
}
