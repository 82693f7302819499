//! Command implementations for runblock.
//!
//! The dispatcher loads configuration, applies flag overrides and routes to
//! one of three modes: run once, dry-run plan, or watch. SIGINT and SIGTERM
//! fire a shared cancellation token, so a running block is killed and watch
//! mode stops cleanly.

mod plan;
mod run;
mod watch;

use crate::cli::Cli;
use crate::config::RunnerConfig;
use crate::error::{Result, RunblockError};
use crate::runner::CancelToken;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Dispatch the parsed command line to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    if cli.watch && cli.file.is_none() {
        return Err(RunblockError::UserError(
            "--watch requires a file argument (cannot watch stdin)".to_string(),
        ));
    }

    let config = load_config(&cli)?;

    let cancel = CancelToken::new();
    if let (true, Some(path)) = (cli.watch, cli.file.as_deref()) {
        install_interrupt_handler(&cancel);
        return watch::cmd_watch(path, config, &cancel);
    }

    let source = read_input(cli.file.as_deref())?;
    if cli.dry_run {
        plan::cmd_plan(&source, &config, cli.json)
    } else {
        install_interrupt_handler(&cancel);
        run::cmd_run(&source, config, &cancel)
    }
}

/// Cancel `token` on SIGINT or SIGTERM (Ctrl-C or Ctrl-Break on Windows).
///
/// Only one handler can be installed per process; later attempts keep the
/// first handler and are logged.
fn install_interrupt_handler(token: &CancelToken) {
    let token = token.clone();
    match ctrlc::set_handler(move || token.cancel()) {
        Ok(()) => debug!("installed interrupt handler"),
        Err(e) => warn!(error = %e, "failed to install interrupt handler"),
    }
}

fn load_config(cli: &Cli) -> Result<RunnerConfig> {
    let cwd = std::env::current_dir().map_err(|e| {
        RunblockError::UserError(format!("failed to determine current directory: {}", e))
    })?;

    let mut config = RunnerConfig::discover(cli.config.as_deref(), &cwd)?;
    config.apply_overrides(cli.default_command.as_deref(), &cli.commands);
    config.validate()?;
    Ok(config)
}

/// Read the Markdown document from `path`, or from stdin when `None`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_document(path),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| RunblockError::UserError(format!("failed to read stdin: {}", e)))?;
            Ok(source)
        }
    }
}

pub(crate) fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        RunblockError::UserError(format!("failed to read '{}': {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DirGuard, write_file};
    use clap::Parser;
    use serial_test::serial;
    use std::ffi::OsStr;
    use tempfile::TempDir;

    #[test]
    fn test_read_document_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_document(&dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, RunblockError::UserError(_)));
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn test_watch_without_file_is_user_error() {
        let cli = Cli::try_parse_from(["runblock", "--watch"]).unwrap();
        let err = dispatch(cli).unwrap_err();
        assert_eq!(
            err.to_string(),
            "--watch requires a file argument (cannot watch stdin)"
        );
        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
    }

    #[test]
    #[serial]
    fn test_flags_override_discovered_config() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            ".runblock.yaml",
            "default_command: cat\ncommands:\n  go: gofmt\n",
        );
        let _guard = DirGuard::new(dir.path());

        let cli = Cli::try_parse_from(["runblock", "--command", "go=goimports"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.default_command, "cat");
        assert_eq!(config.commands.get("go").map(String::as_str), Some("goimports"));

        let cli = Cli::try_parse_from(["runblock", "--default-command", "wc -l"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.default_command, "wc -l");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_dispatch_runs_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let doc = format!("```sh cat > {}\nhello\n```\n", out.display());
        let path = write_file(dir.path(), "doc.md", &doc);
        let _guard = DirGuard::new(dir.path());

        let cli = Cli::try_parse_from([OsStr::new("runblock"), path.as_os_str()]).unwrap();
        dispatch(cli).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello\n");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_dispatch_reports_failing_block() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "doc.md", "```sh true\n```\n\n```sh exit 4\n```\n");
        let _guard = DirGuard::new(dir.path());

        let cli = Cli::try_parse_from([OsStr::new("runblock"), path.as_os_str()]).unwrap();
        let err = dispatch(cli).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to execute code block 2: command 'exit 4' exited with status 4"
        );
        assert_eq!(err.exit_code(), crate::exit_codes::EXECUTION_FAILURE);
    }
}
