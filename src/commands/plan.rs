//! Implementation of `--dry-run`: show what each block would run.

use crate::config::RunnerConfig;
use crate::error::{Result, RunblockError};
use crate::parser::parse;
use crate::runner::{CommandSource, PlannedBlock, plan_all};

pub fn cmd_plan(source: &str, config: &RunnerConfig, json: bool) -> Result<()> {
    let blocks = parse(source);
    let plan = plan_all(&blocks, config)?;

    if json {
        let out = serde_json::to_string_pretty(&plan)
            .map_err(|e| RunblockError::Io(format!("failed to serialize plan: {}", e)))?;
        println!("{}", out);
    } else {
        for entry in &plan {
            println!("{}", render(entry));
        }
    }
    Ok(())
}

/// One human-readable line per block.
fn render(entry: &PlannedBlock) -> String {
    let lang = if entry.language.is_empty() {
        "-"
    } else {
        entry.language.as_str()
    };
    let label = format!("block {} [{}]", entry.index + 1, lang);

    match (&entry.invocation, entry.source) {
        (Some(invocation), Some(source)) => {
            format!("{}: {} ({})", label, invocation, source_name(source))
        }
        (None, Some(_)) => format!("{}: skipped (command expanded to nothing)", label),
        _ => format!("{}: skipped (no command)", label),
    }
}

fn source_name(source: CommandSource) -> &'static str {
    match source {
        CommandSource::Explicit => "from block",
        CommandSource::Language => "from language",
        CommandSource::Default => "default",
    }
}
