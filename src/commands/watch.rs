//! Implementation of `--watch`.
//!
//! Each run re-reads and re-parses the document so edits to fences and
//! commands take effect without restarting.

use super::read_document;
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::parser::parse;
use crate::runner::{CancelToken, Runner};
use crate::watch::watch_file;
use std::path::Path;

pub fn cmd_watch(path: &Path, config: RunnerConfig, cancel: &CancelToken) -> Result<()> {
    let window = config.debounce();
    let mut runner = Runner::new(config);

    watch_file(path, window, cancel, || {
        let blocks = parse(&read_document(path)?);
        runner.run_all(&blocks, cancel)
    })
}
