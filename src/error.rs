//! Error types for runblock.
//!
//! Uses thiserror for derive macros. Expression and template failures keep
//! their own types (`ExpressionError`, `TemplateError`) and are wrapped here.

use crate::exit_codes;
use crate::template::TemplateError;
use thiserror::Error;

/// Main error type for runblock operations.
#[derive(Error, Debug)]
pub enum RunblockError {
    /// User provided invalid arguments, input, or configuration.
    #[error("{0}")]
    UserError(String),

    /// A command template could not be expanded.
    #[error("failed to expand command template: {0}")]
    Template(#[from] TemplateError),

    /// The resolved program could not be started.
    #[error(
        "failed to start '{program}': {source}\n\
         Fix: ensure the command is installed and in PATH."
    )]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but did not exit successfully.
    #[error("command '{command}' {}", describe_exit(*code))]
    Exit {
        command: String,
        /// Exit code, or `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// Execution was cancelled by the caller.
    #[error("execution cancelled")]
    Cancelled,

    /// A failure while executing a specific block.
    #[error("failed to execute code block {number}: {source}")]
    Block {
        /// 1-based position of the block in the document.
        number: usize,
        #[source]
        source: Box<RunblockError>,
    },

    /// File watching failed.
    #[error("watch failed: {0}")]
    Watch(String),

    /// I/O failure while feeding or draining a child process.
    #[error("I/O error: {0}")]
    Io(String),
}

impl RunblockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunblockError::UserError(_) => exit_codes::USER_ERROR,
            RunblockError::Template(_) => exit_codes::EXPANSION_FAILURE,
            RunblockError::Launch { .. } => exit_codes::EXECUTION_FAILURE,
            RunblockError::Exit { .. } => exit_codes::EXECUTION_FAILURE,
            RunblockError::Cancelled => exit_codes::CANCELLED,
            RunblockError::Block { source, .. } => source.exit_code(),
            RunblockError::Watch(_) => exit_codes::USER_ERROR,
            RunblockError::Io(_) => exit_codes::EXECUTION_FAILURE,
        }
    }

    /// Wrap this error with the 0-based index of the block it came from.
    pub fn in_block(self, index: usize) -> Self {
        RunblockError::Block {
            number: index + 1,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through block context.
    pub fn root(&self) -> &RunblockError {
        match self {
            RunblockError::Block { source, .. } => source.root(),
            other => other,
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Result type alias for runblock operations.
pub type Result<T> = std::result::Result<T, RunblockError>;
