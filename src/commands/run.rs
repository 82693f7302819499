//! Implementation of the default mode: run every block once.

use crate::config::RunnerConfig;
use crate::error::Result;
use crate::parser::parse;
use crate::runner::{CancelToken, Runner};
use tracing::info;

pub fn cmd_run(source: &str, config: RunnerConfig, cancel: &CancelToken) -> Result<()> {
    let blocks = parse(source);
    info!(count = blocks.len(), "found code blocks");

    Runner::new(config).run_all(&blocks, cancel)
}
