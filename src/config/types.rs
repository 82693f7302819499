//! Configuration constants, defaults and override parsing.

use crate::error::{Result, RunblockError};
use std::str::FromStr;

/// File looked up in the current directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = ".runblock.yaml";

/// Default quiet window for watch mode, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

pub(super) fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// A `LANG=CMD` pair from the command line.
///
/// The split happens at the first `=`, so the command itself may contain
/// `=` characters. An empty command is allowed and disables the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOverride {
    pub language: String,
    pub command: String,
}

impl FromStr for CommandOverride {
    type Err = RunblockError;

    fn from_str(s: &str) -> Result<Self> {
        let Some((language, command)) = s.split_once('=') else {
            return Err(RunblockError::UserError(format!(
                "invalid command override '{}': expected LANG=CMD",
                s
            )));
        };

        let language = language.trim();
        if language.is_empty() {
            return Err(RunblockError::UserError(format!(
                "invalid command override '{}': language must not be empty",
                s
            )));
        }

        Ok(Self {
            language: language.to_string(),
            command: command.to_string(),
        })
    }
}
