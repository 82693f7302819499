//! Runner configuration.
//!
//! `RunnerConfig` maps languages to command templates and carries the
//! default command and the watch-mode debounce window. It is loaded from
//! `.runblock.yaml` (or an explicit `--config` path), then adjusted by
//! command-line overrides. Unknown YAML fields are ignored and every field
//! has a default, so an empty file is a valid config.

mod model;
mod operations;
pub mod types;


pub use model::RunnerConfig;
pub use types::{CONFIG_FILE_NAME, CommandOverride, DEFAULT_DEBOUNCE_MS};
