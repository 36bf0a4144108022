//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::Write;

use super::test_interfaces::{ExternalTestError, ScriptExecutor, TestDiscovery};
use super::test_runner::{self, InvocationRequest, TestReporter};
use super::{CliError, CliResult, ExitCode};

/// `list`: print the discovered test names.
pub fn list_external_tests(discovery: &dyn TestDiscovery, out: &mut dyn Write) -> CliResult<ExitCode> {
    let registry = discovery.discover();
    out.write_all(test_runner::format_test_listing(&registry).as_bytes())
        .map_err(|e| CliError::failure(format!("failed to write test list: {e}")))?;
    Ok(ExitCode::SUCCESS)
}

/// `test`: select scripts and run them against the requested compiler binary.
///
/// Selection errors abort before anything runs. Otherwise the result is the first failing script's status, or
/// success.
pub fn run_external_tests(
    request: &InvocationRequest,
    discovery: &dyn TestDiscovery,
    executor: &dyn ScriptExecutor,
    reporter: &mut dyn TestReporter,
) -> CliResult<ExitCode> {
    let registry = discovery.discover();
    let selected = test_runner::select_tests(&registry, &request.selection)?;

    let status = test_runner::run_test_scripts(
        &selected,
        request.binary_type,
        &request.binary_path,
        executor,
        reporter,
    )?;
    Ok(ExitCode(status))
}

impl From<ExternalTestError> for CliError {
    fn from(err: ExternalTestError) -> Self {
        let exit_code = match err {
            ExternalTestError::NotFound(_) => ExitCode::NO_INPUT,
            ExternalTestError::NotSelected | ExternalTestError::Spawn { .. } | ExternalTestError::CurrentExe(_) => {
                ExitCode::FAILURE
            }
        };
        CliError::new(err.to_string(), exit_code)
    }
}
