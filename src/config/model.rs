//! RunnerConfig struct definition and default implementation.

use super::types::default_debounce_ms;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which command runs for which code block.
///
/// # Example
///
/// ```yaml
/// default_command: ""
/// commands:
///   go: gofmt
///   python: python3 -
///   sh: "{{ content.contains('sudo') ? '' : 'sh' }}"
/// debounce_ms: 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Command template used when neither the block nor `commands` names
    /// one. Empty means "no default".
    pub default_command: String,

    /// Per-language command templates, keyed by fence language.
    pub commands: BTreeMap<String, String>,

    /// Watch-mode quiet window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_command: String::new(),
            commands: BTreeMap::new(),
            debounce_ms: default_debounce_ms(),
        }
    }
}
