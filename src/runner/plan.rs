//! Dry-run planning: resolve and expand every block's command without
//! launching anything.

use super::{CommandSource, prepare};
use crate::command::Invocation;
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::parser::CodeBlock;
use serde::Serialize;

/// What the runner would do for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedBlock {
    pub index: usize,
    pub language: String,
    /// Where the command template came from, if any was found.
    pub source: Option<CommandSource>,
    /// The unexpanded command template.
    pub command: Option<String>,
    /// The trimmed expansion of `command`.
    pub expanded: Option<String>,
    pub invocation: Option<Invocation>,
    pub skipped: bool,
}

/// Plan a single block. Errors are wrapped with the block's position.
pub fn plan_block(block: &CodeBlock, index: usize, config: &RunnerConfig) -> Result<PlannedBlock> {
    let prepared = prepare(block, index, config).map_err(|e| e.in_block(index))?;

    Ok(PlannedBlock {
        index,
        language: block.language.clone(),
        source: prepared.resolved.map(|r| r.source),
        command: prepared.resolved.map(|r| r.template.to_string()),
        skipped: prepared.invocation.is_none(),
        expanded: prepared.expanded,
        invocation: prepared.invocation,
    })
}

/// Plan every block in order, stopping at the first expansion failure.
pub fn plan_all(blocks: &[CodeBlock], config: &RunnerConfig) -> Result<Vec<PlannedBlock>> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| plan_block(block, index, config))
        .collect()
}
