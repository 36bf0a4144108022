//! CLI module for the external test dispatcher
//!
//! ## Commands
//!
//! - `list` - Print the available external tests
//! - `test --solc-binary-type T --solc-binary-path P (--run NAME... | --run-all)` - Run external tests
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `test_interfaces` - Discovery/execution boundaries and the error taxonomy
//! - `test_runner` - Test discovery, selection and execution
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod test_interfaces;
pub mod test_runner;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DiscoveryConfig;
use test_interfaces::{ExternalTestError, FsTestDiscovery, ShellScriptExecutor};
use test_runner::{ConsoleReporter, InvocationRequest, TestSelection};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// `EX_NOINPUT` from sysexits.h
    pub const NO_INPUT: ExitCode = ExitCode(66);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Script to run external Solidity tests.
#[derive(Parser, Debug)]
#[command(name = "external-tests")]
#[command(version = VERSION)]
#[command(about = "Script to run external Solidity tests.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the external test scripts (default: externalTests next to this executable)
    #[arg(long = "tests-dir", value_name = "DIR", env = "EXTERNAL_TESTS_DIR", global = true)]
    pub tests_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all available external tests.
    List,

    /// Run external tests.
    Test {
        /// Type of the solidity compiler binary to be used.
        #[arg(long = "solc-binary-type", value_enum)]
        solc_binary_type: SolcBinaryType,
        /// Path to the solidity compiler binary.
        #[arg(long = "solc-binary-path", value_name = "PATH")]
        solc_binary_path: PathBuf,
        /// Run one or more given external tests.
        #[arg(long = "run", value_name = "TEST_NAME", num_args = 1.., conflicts_with = "run_all")]
        run: Vec<String>,
        /// Run all available external tests.
        #[arg(long = "run-all")]
        run_all: bool,
    },
}

/// Kind of compiler binary handed to each external test script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolcBinaryType {
    Native,
    Solcjs,
}

impl SolcBinaryType {
    pub fn as_str(self) -> &'static str {
        match self {
            SolcBinaryType::Native => "native",
            SolcBinaryType::Solcjs => "solcjs",
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e.message);
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = resolve_config(cli.tests_dir)?;
    let discovery = FsTestDiscovery::new(config);

    match cli.command {
        Command::List => commands::list_external_tests(&discovery, &mut io::stdout()),
        Command::Test {
            solc_binary_type,
            solc_binary_path,
            run,
            run_all,
        } => {
            let request = InvocationRequest {
                binary_type: solc_binary_type,
                binary_path: solc_binary_path,
                selection: TestSelection::from_args(run_all, run),
            };
            commands::run_external_tests(&request, &discovery, &ShellScriptExecutor, &mut ConsoleReporter)
        }
    }
}

/// Explicit `--tests-dir` / `EXTERNAL_TESTS_DIR`, else the directory next to the executable.
fn resolve_config(tests_dir: Option<PathBuf>) -> CliResult<DiscoveryConfig> {
    match tests_dir {
        Some(dir) => Ok(DiscoveryConfig::new().with_tests_dir(dir)),
        None => DiscoveryConfig::from_current_exe().map_err(|e| ExternalTestError::CurrentExe(e).into()),
    }
}

// ============================================================================
// Tests
// ============================================================================
