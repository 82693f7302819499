//! Exit code constants for the runblock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable input, invalid config)
//! - 2: Template expansion failure
//! - 3: Process launch failure or non-zero exit of a block's command
//! - 130: Cancelled

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable input, invalid configuration.
pub const USER_ERROR: i32 = 1;

/// A command template failed to expand.
pub const EXPANSION_FAILURE: i32 = 2;

/// A block's command could not be started or exited non-zero.
pub const EXECUTION_FAILURE: i32 = 3;

/// Execution was cancelled before it completed.
pub const CANCELLED: i32 = 130;
