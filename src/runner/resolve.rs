//! Command resolution for a code block.
//!
//! # Resolution Order
//!
//! 1. The block's own command (from the fence info string)
//! 2. The per-language command from configuration
//! 3. The default command from configuration
//! 4. Nothing: the block is skipped

use crate::config::RunnerConfig;
use crate::parser::CodeBlock;
use serde::Serialize;

/// The command template chosen for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCommand<'a> {
    pub template: &'a str,
    pub source: CommandSource,
}

/// Where a resolved command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    /// Command written in the block's info string.
    Explicit,
    /// Per-language command from configuration.
    Language,
    /// Default command from configuration.
    Default,
}

/// Resolve which command template applies to `block`.
///
/// Returns `None` when no non-empty command is configured; that block is
/// skipped rather than treated as an error.
pub fn resolve_command<'a>(
    block: &'a CodeBlock,
    config: &'a RunnerConfig,
) -> Option<ResolvedCommand<'a>> {
    if !block.command.is_empty() {
        return Some(ResolvedCommand {
            template: &block.command,
            source: CommandSource::Explicit,
        });
    }

    if let Some(command) = config.commands.get(&block.language) {
        if !command.is_empty() {
            return Some(ResolvedCommand {
                template: command,
                source: CommandSource::Language,
            });
        }
    }

    if !config.default_command.is_empty() {
        return Some(ResolvedCommand {
            template: &config.default_command,
            source: CommandSource::Default,
        });
    }

    None
}
