//! Block executor.
//!
//! For each block the runner:
//!
//! 1. Resolves the command template (explicit > per-language > default)
//! 2. Expands `{{ ... }}` spans against the block's scope (`lang`, `content`, `i`)
//! 3. Skips the block if the result is empty after trimming
//! 4. Builds the invocation (bare executable or shell string)
//! 5. Runs the child with the content on stdin and in `CODEBLOCK_*` variables
//!
//! Blocks run strictly one after another; [`Runner::run_all`] stops at the
//! first failure. A block with no command, or whose command expands to
//! nothing, is skipped without error.

mod cancel;
mod executor;
mod plan;
mod resolve;


pub use cancel::CancelToken;
pub use executor::{ENV_CONTENT, ENV_INDEX, ENV_LANG, OutputSink};
pub use plan::{PlannedBlock, plan_all, plan_block};
pub use resolve::{CommandSource, ResolvedCommand, resolve_command};

use crate::command::{Invocation, build_command};
use crate::config::RunnerConfig;
use crate::error::{Result, RunblockError};
use crate::expr::Scope;
use crate::parser::CodeBlock;
use crate::template::expand;
use tracing::{debug, info};

/// Executes commands for code blocks.
#[derive(Debug)]
pub struct Runner {
    config: RunnerConfig,
    stdout: OutputSink,
    stderr: OutputSink,
}

/// A block's command after resolution, expansion and classification.
#[derive(Debug, Clone)]
pub(crate) struct Prepared<'a> {
    pub resolved: Option<ResolvedCommand<'a>>,
    /// Trimmed expansion result; `None` when no command was resolved.
    pub expanded: Option<String>,
    /// `None` when the block is skipped.
    pub invocation: Option<Invocation>,
}

impl Runner {
    /// Create a runner whose children share this process's stdout and stderr.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            stdout: OutputSink::Inherit,
            stderr: OutputSink::Inherit,
        }
    }

    pub fn with_stdout(mut self, sink: OutputSink) -> Self {
        self.stdout = sink;
        self
    }

    pub fn with_stderr(mut self, sink: OutputSink) -> Self {
        self.stderr = sink;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute the command for one block. `index` is the block's 0-based
    /// position in the document.
    ///
    /// Errors are wrapped with the block's position.
    pub fn run(&mut self, block: &CodeBlock, index: usize, cancel: &CancelToken) -> Result<()> {
        self.run_block(block, index, cancel)
            .map_err(|e| e.in_block(index))
    }

    /// Execute all blocks in order, stopping at the first failure.
    pub fn run_all(&mut self, blocks: &[CodeBlock], cancel: &CancelToken) -> Result<()> {
        for (index, block) in blocks.iter().enumerate() {
            self.run(block, index, cancel)?;
        }
        Ok(())
    }

    fn run_block(&mut self, block: &CodeBlock, index: usize, cancel: &CancelToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(RunblockError::Cancelled);
        }

        let prepared = prepare(block, index, &self.config)?;
        let (Some(invocation), Some(expanded)) = (prepared.invocation, prepared.expanded) else {
            debug!(index, language = %block.language, "skipping block: no command");
            return Ok(());
        };

        info!(
            index,
            language = %block.language,
            invocation = %invocation,
            "running block"
        );
        executor::execute(
            &invocation,
            &expanded,
            block,
            index,
            &mut self.stdout,
            &mut self.stderr,
            cancel,
        )
    }
}

/// The variables visible to a block's command template.
pub fn block_scope(block: &CodeBlock, index: usize) -> Scope {
    Scope::new()
        .with("lang", block.language.as_str())
        .with("content", block.content.as_str())
        .with("i", index)
}

/// Resolve, expand and classify the command for `block` without running it.
pub(crate) fn prepare<'a>(
    block: &'a CodeBlock,
    index: usize,
    config: &'a RunnerConfig,
) -> Result<Prepared<'a>> {
    let Some(resolved) = resolve_command(block, config) else {
        return Ok(Prepared {
            resolved: None,
            expanded: None,
            invocation: None,
        });
    };

    let expanded = expand(resolved.template, &block_scope(block, index))?;
    let expanded = expanded.trim().to_string();
    if expanded.is_empty() {
        debug!(index, template = resolved.template, "command expanded to nothing");
        return Ok(Prepared {
            resolved: Some(resolved),
            expanded: Some(expanded),
            invocation: None,
        });
    }

    let invocation = build_command(&expanded)?;
    Ok(Prepared {
        resolved: Some(resolved),
        expanded: Some(expanded),
        invocation: Some(invocation),
    })
}
