//! Command builder: turns an expanded command string into a process invocation.
//!
//! A string made only of `[A-Za-z0-9_.+-]` characters names a bare
//! executable and is run directly. Anything else (arguments, pipes,
//! redirects, quotes, paths) is handed to the platform shell.

use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static BARE_EXECUTABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-_.+a-zA-Z0-9]+$").expect("Invalid bare executable regex")
});

/// Shell used when `SHELL` is unset or empty.
pub const FALLBACK_SHELL: &str = "/bin/sh";

/// A concrete program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Whether this invocation goes through a shell interpreter.
    pub fn is_shell(&self) -> bool {
        !self.args.is_empty()
    }
}

/// Renders the invocation with shell quoting, for logs and dry runs.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        f.write_str(&shell_words::join(words))
    }
}

/// Whether `command` is a single bare executable name.
pub fn is_bare_executable(command: &str) -> bool {
    BARE_EXECUTABLE_REGEX.is_match(command)
}

/// Build the invocation for an expanded command string.
///
/// Bare executable names are returned as-is with no arguments. Everything
/// else runs as `cmd /c <command>` on Windows and `<shell> -c <command>`
/// elsewhere, where `<shell>` comes from `SHELL`.
///
/// This never fails today; the `Result` leaves room for validation of the
/// command string.
pub fn build_command(command: &str) -> Result<Invocation> {
    if is_bare_executable(command) {
        return Ok(Invocation {
            program: command.to_string(),
            args: Vec::new(),
        });
    }

    if cfg!(windows) {
        return Ok(Invocation {
            program: "cmd".to_string(),
            args: vec!["/c".to_string(), command.to_string()],
        });
    }

    Ok(Invocation {
        program: detect_shell(),
        args: vec!["-c".to_string(), command.to_string()],
    })
}

/// The interpreter named by `SHELL`, or [`FALLBACK_SHELL`].
pub fn detect_shell() -> String {
    shell_or_fallback(std::env::var("SHELL").ok())
}

fn shell_or_fallback(shell: Option<String>) -> String {
    match shell {
        Some(sh) if !sh.is_empty() => sh,
        _ => FALLBACK_SHELL.to_string(),
    }
}
