//! Runblock: run the fenced code blocks of a Markdown document through
//! external commands.
//!
//! The pipeline for each block is: resolve a command template, expand its
//! `{{ expression }}` spans ([`template`] over [`expr`]), turn the result into
//! a process invocation ([`command`]) and run it with the block's content on
//! stdin ([`runner`]).

pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod expr;
pub mod logging;
pub mod parser;
pub mod runner;
pub mod template;
pub mod watch;

#[cfg(test)]
mod test_support;
