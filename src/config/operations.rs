//! Config loading, validation, discovery and overrides.

use super::model::RunnerConfig;
use super::types::{CONFIG_FILE_NAME, CommandOverride};
use crate::error::{Result, RunblockError};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

impl RunnerConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(RunnerConfig)` - Successfully loaded and validated config
    /// * `Err(RunblockError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            RunblockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            RunblockError::UserError(format!("{} ({})", e, path.display()))
        })
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RunnerConfig = serde_yaml::from_str(yaml).map_err(|e| {
            RunblockError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            RunblockError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `debounce_ms` must be positive
    /// - language keys in `commands` must be free of whitespace
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms == 0 {
            return Err(RunblockError::UserError(
                "config validation failed: debounce_ms must be greater than 0".to_string(),
            ));
        }

        // Fence languages end at the first space, so such a key never matches.
        if let Some(lang) = self.commands.keys().find(|k| k.contains(char::is_whitespace)) {
            return Err(RunblockError::UserError(format!(
                "config validation failed: language '{}' in commands must not contain whitespace",
                lang
            )));
        }

        Ok(())
    }

    /// Find and load the configuration.
    ///
    /// An explicit path must exist. Otherwise `.runblock.yaml` in `dir` is
    /// used when present, and defaults when not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading discovered config");
            return Self::load(candidate);
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn apply_overrides(
        &mut self,
        default_command: Option<&str>,
        commands: &[CommandOverride],
    ) {
        if let Some(cmd) = default_command {
            self.default_command = cmd.to_string();
        }
        for o in commands {
            self.commands.insert(o.language.clone(), o.command.clone());
        }
    }

    /// The watch-mode quiet window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
