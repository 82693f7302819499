//! CLI argument parsing for runblock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Implementations live in the `commands` module.

use crate::config::CommandOverride;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Runblock: run the fenced code blocks of a Markdown document through
/// commands.
///
/// Each block's content is piped to its command's stdin. A block's command
/// comes from its fence info string (```` ```go gofmt ````), then from the
/// per-language `--command` entries, then from `--default-command`. Commands
/// may contain `{{ expression }}` spans over `lang`, `content` and `i`.
#[derive(Parser, Debug)]
#[command(name = "runblock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Markdown file to process. Reads standard input when omitted.
    #[arg(value_name = "MARKDOWN_FILE")]
    pub file: Option<PathBuf>,

    /// Command template for blocks with no explicit or per-language command.
    #[arg(long, value_name = "CMD")]
    pub default_command: Option<String>,

    /// Per-language command template (repeatable).
    #[arg(
        long = "command",
        value_name = "LANG=CMD",
        value_parser = parse_command_override
    )]
    pub commands: Vec<CommandOverride>,

    /// Configuration file (default: ./.runblock.yaml if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Re-run all blocks whenever the file changes.
    #[arg(short, long)]
    pub watch: bool,

    /// Print what would run for each block without running anything.
    #[arg(long, conflicts_with = "watch")]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON.
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Increase diagnostic output (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

fn parse_command_override(s: &str) -> Result<CommandOverride, String> {
    s.parse::<CommandOverride>().map_err(|e| e.to_string())
}
