//! External test I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two side-effecting operations of the dispatcher:
//! - Test discovery (filesystem scan of the external tests directory)
//! - Script execution (spawning a test script and waiting for its exit status)
//!
//! The runner only talks to these traits, so selection and fail-fast behavior can be exercised with stubs.

use std::io;
use std::process::{Command, ExitStatus};

use thiserror::Error;

use super::test_runner::TestRegistry;
use crate::config::DiscoveryConfig;

/// Errors that occur while selecting or launching external tests
#[derive(Debug, Error)]
pub enum ExternalTestError {
    #[error("External test(s): {} not found", .0.join(" "))]
    NotFound(Vec<String>),

    #[error("External test was not selected. Please use --run or --run-all option")]
    NotSelected,

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to locate the external tests directory: {0}")]
    CurrentExe(#[source] io::Error),
}

// ============================================================================
// Test Discovery Interface
// ============================================================================

/// Find the external test scripts available to run.
pub trait TestDiscovery {
    /// Build a fresh registry of test name → script path.
    fn discover(&self) -> TestRegistry;
}

// ============================================================================
// Script Executor Interface
// ============================================================================

/// Run a single command line and report its exit status.
///
/// The executor owns how the process is spawned and where its output goes; callers only see the status.
pub trait ScriptExecutor {
    fn run_command(&self, command_line: &str) -> Result<i32, ExternalTestError>;
}

// ============================================================================
// Default Implementations
// ============================================================================

/// Single-level directory scan driven by a [`DiscoveryConfig`].
pub struct FsTestDiscovery {
    pub config: DiscoveryConfig,
}

impl FsTestDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }
}

impl TestDiscovery for FsTestDiscovery {
    fn discover(&self) -> TestRegistry {
        super::test_runner::discover_external_tests(&self.config)
    }
}

/// Runs command lines through `sh -c`, inheriting stdio and blocking until exit.
#[derive(Default)]
pub struct ShellScriptExecutor;

impl ScriptExecutor for ShellScriptExecutor {
    fn run_command(&self, command_line: &str) -> Result<i32, ExternalTestError> {
        tracing::debug!(command = command_line, "spawning external test");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .status()
            .map_err(|source| ExternalTestError::Spawn {
                command: command_line.to_string(),
                source,
            })?;
        Ok(exit_status_code(status))
    }
}

/// Numeric status of a finished process; signal deaths map to `128 + signal` like a shell does.
fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Quote a single shell word if it contains anything outside a conservative safe set.
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ':' | ',' | '=' | '@'));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_every_missing_name() {
        let err = ExternalTestError::NotFound(vec!["gnosis".into(), "colony".into()]);
        assert_eq!(err.to_string(), "External test(s): gnosis colony not found");
    }

    #[test]
    fn test_not_selected_message() {
        assert_eq!(
            ExternalTestError::NotSelected.to_string(),
            "External test was not selected. Please use --run or --run-all option"
        );
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/usr/bin/solc"), "/usr/bin/solc");
        assert_eq!(shell_quote("native"), "native");
        assert_eq!(shell_quote("/tmp/my dir/solc"), "'/tmp/my dir/solc'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_executor_reports_exit_status() {
        let executor = ShellScriptExecutor;
        assert_eq!(executor.run_command("true").unwrap(), 0);
        assert_eq!(executor.run_command("exit 7").unwrap(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_executor_maps_signals() {
        let executor = ShellScriptExecutor;
        assert_eq!(executor.run_command("kill -TERM $$").unwrap(), 128 + 15);
    }
}
