//! Child process execution for a single block.
//!
//! The block's content is written to the child's stdin from a helper thread
//! while the calling thread waits for the child, polling the cancellation
//! token. Captured output is drained into the configured sinks from helper
//! threads as well, so a chatty child never blocks on a full pipe.

use super::cancel::CancelToken;
use crate::command::Invocation;
use crate::error::{Result, RunblockError};
use crate::parser::CodeBlock;
use std::fmt;
use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the block's language.
pub const ENV_LANG: &str = "CODEBLOCK_LANG";
/// Environment variable holding the block's content.
pub const ENV_CONTENT: &str = "CODEBLOCK_CONTENT";
/// Environment variable holding the block's 0-based index.
pub const ENV_INDEX: &str = "CODEBLOCK_INDEX";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Destination for a child's stdout or stderr.
pub enum OutputSink {
    /// Share the parent's stream directly.
    Inherit,
    /// Copy the child's output into a writer.
    Writer(Box<dyn Write + Send>),
}

impl OutputSink {
    /// Capture output into `writer`.
    pub fn capture(writer: impl Write + Send + 'static) -> Self {
        OutputSink::Writer(Box::new(writer))
    }

    fn stdio(&self) -> Stdio {
        match self {
            OutputSink::Inherit => Stdio::inherit(),
            OutputSink::Writer(_) => Stdio::piped(),
        }
    }

    fn writer(&mut self) -> Option<&mut (dyn Write + Send)> {
        match self {
            OutputSink::Inherit => None,
            OutputSink::Writer(w) => Some(w.as_mut()),
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSink::Inherit => write!(f, "Inherit"),
            OutputSink::Writer(_) => write!(f, "Writer(..)"),
        }
    }
}

/// Run `invocation` for `block` to completion.
///
/// `command` is the expanded command string, used in error messages.
pub(crate) fn execute(
    invocation: &Invocation,
    command: &str,
    block: &CodeBlock,
    index: usize,
    stdout: &mut OutputSink,
    stderr: &mut OutputSink,
    cancel: &CancelToken,
) -> Result<()> {
    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .env(ENV_LANG, &block.language)
        .env(ENV_CONTENT, &block.content)
        .env(ENV_INDEX, index.to_string())
        .stdin(Stdio::piped())
        .stdout(stdout.stdio())
        .stderr(stderr.stdio())
        .spawn()
        .map_err(|source| RunblockError::Launch {
            program: invocation.program.clone(),
            source,
        })?;

    debug!(pid = child.id(), program = %invocation.program, "spawned child process");

    let stdin = child.stdin.take();
    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();
    let content = block.content.as_str();
    let stdout_sink = stdout.writer();
    let stderr_sink = stderr.writer();

    let (waited, io_result) = thread::scope(|scope| {
        let feeder = scope.spawn(move || feed_stdin(stdin, content));
        let out = match (child_stdout, stdout_sink) {
            (Some(pipe), Some(sink)) => Some(scope.spawn(move || drain(pipe, sink))),
            _ => None,
        };
        let err = match (child_stderr, stderr_sink) {
            (Some(pipe), Some(sink)) => Some(scope.spawn(move || drain(pipe, sink))),
            _ => None,
        };

        let waited = wait_for_exit(&mut child, cancel);

        let mut io_result = join(feeder);
        for handle in [out, err].into_iter().flatten() {
            let drained = join(handle);
            if io_result.is_ok() {
                io_result = drained;
            }
        }
        (waited, io_result)
    });

    let status = match waited {
        Ok(Some(status)) => status,
        Ok(None) => return Err(RunblockError::Cancelled),
        Err(e) => {
            return Err(RunblockError::Io(format!(
                "failed to wait for '{}': {}",
                invocation.program, e
            )));
        }
    };

    // A child that died from the same interrupt that fired the token.
    if !status.success() && cancel.is_cancelled() {
        return Err(RunblockError::Cancelled);
    }
    if !status.success() {
        return Err(RunblockError::Exit {
            command: command.to_string(),
            code: status.code(),
        });
    }

    io_result.map_err(|e| RunblockError::Io(format!("failed to relay process output: {}", e)))
}

/// Write the whole content to the child's stdin, then close it.
///
/// A child that exits without reading its input closes the pipe early; that
/// is not an error.
fn feed_stdin(stdin: Option<ChildStdin>, content: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(content.as_bytes()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn drain(mut pipe: impl Read, sink: &mut (dyn Write + Send)) -> io::Result<()> {
    io::copy(&mut pipe, sink)?;
    sink.flush()
}

fn join(handle: thread::ScopedJoinHandle<'_, io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("output relay thread panicked")))
}

/// Wait for the child, returning `None` if it was killed due to cancellation.
fn wait_for_exit(child: &mut Child, cancel: &CancelToken) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if cancel.is_cancelled() {
            kill_process(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill a process and wait for it to terminate.
fn kill_process(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    if let Err(e) = child.kill() {
        warn!(pid = child.id(), error = %e, "failed to kill child process");
    }
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), error = %e, "failed to reap child process");
    }
}
