//! External test discovery, selection and sequential execution
//!
//! ## TestReporter Trait
//!
//! Progress output is routed through a `TestReporter` so the runner itself never prints. The default
//! `ConsoleReporter` announces each script on stdout before it starts.
//!
//! ## Execution Policy
//!
//! Scripts run one at a time, in selection order. The first non-zero exit status stops the run and becomes the
//! overall status; no retries, no aggregation.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::SolcBinaryType;
use super::test_interfaces::{ExternalTestError, ScriptExecutor, shell_quote};
use crate::config::DiscoveryConfig;

/// Test name (file stem) → script path, iterated in name order.
pub type TestRegistry = BTreeMap<String, PathBuf>;

// ============================================================================
// Discovery
// ============================================================================

/// Scan the configured directory (one level) for external test scripts.
///
/// A missing or unreadable directory is not an error: it simply has no tests.
#[tracing::instrument(skip_all, fields(dir = %config.tests_dir.display()))]
pub fn discover_external_tests(config: &DiscoveryConfig) -> TestRegistry {
    let mut registry = TestRegistry::new();

    let entries = match std::fs::read_dir(&config.tests_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "cannot read external tests directory");
            return registry;
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !path.is_file() || !config.matches_script(&path) {
            tracing::debug!(path = %path.display(), "skipping");
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::debug!(path = %path.display(), "skipping non UTF-8 name");
            continue;
        };
        tracing::debug!(name, path = %path.display(), "discovered external test");
        registry.insert(name.to_string(), path);
    }

    registry
}

/// Header plus one line of space-separated names (empty when nothing was found).
pub fn format_test_listing(registry: &TestRegistry) -> String {
    let names: Vec<&str> = registry.keys().map(String::as_str).collect();
    format!("Available external tests:\n{}\n", names.join(" "))
}

// ============================================================================
// Selection
// ============================================================================

/// Which external tests a `test` invocation asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestSelection {
    /// `--run-all`
    All,
    /// `--run NAME...`, in request order
    Named(Vec<String>),
    /// Neither option given
    Unspecified,
}

impl TestSelection {
    pub fn from_args(run_all: bool, names: Vec<String>) -> Self {
        if run_all {
            TestSelection::All
        } else if names.is_empty() {
            TestSelection::Unspecified
        } else {
            TestSelection::Named(names)
        }
    }
}

/// Parsed `test` command: which binary to test and which scripts to run against it.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub binary_type: SolcBinaryType,
    pub binary_path: PathBuf,
    pub selection: TestSelection,
}

/// Resolve a selection against the registry.
///
/// Named selections keep request order and run each name once. If any name is unknown, every unknown name is
/// reported and nothing is selected.
pub fn select_tests(
    registry: &TestRegistry,
    selection: &TestSelection,
) -> Result<Vec<(String, PathBuf)>, ExternalTestError> {
    match selection {
        TestSelection::All => Ok(registry.iter().map(|(n, p)| (n.clone(), p.clone())).collect()),
        TestSelection::Named(names) => {
            let mut seen = HashSet::new();
            let unique: Vec<&String> = names.iter().filter(|n| seen.insert(n.as_str())).collect();

            let missing: Vec<String> = unique
                .iter()
                .filter(|n| !registry.contains_key(n.as_str()))
                .map(|n| n.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(ExternalTestError::NotFound(missing));
            }

            Ok(unique
                .into_iter()
                .filter_map(|n| registry.get(n).map(|p| (n.clone(), p.clone())))
                .collect())
        }
        TestSelection::Unspecified => Err(ExternalTestError::NotSelected),
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Trait for reporting external test progress.
pub trait TestReporter {
    /// Called right before a script is handed to the executor
    fn on_test_start(&mut self, name: &str);

    /// Called with the script's exit status
    fn on_test_finished(&mut self, _name: &str, _status: i32) {}
}

/// Default console reporter
#[derive(Default)]
pub struct ConsoleReporter;

impl TestReporter for ConsoleReporter {
    fn on_test_start(&mut self, name: &str) {
        println!("Running {} external test...", name);
    }

    fn on_test_finished(&mut self, name: &str, status: i32) {
        if status != 0 {
            tracing::warn!(test = name, status, "external test failed");
        }
    }
}

/// `<script> <binary type> <binary path>`, each word shell-quoted as needed.
pub fn build_command_line(script: &Path, binary_type: SolcBinaryType, binary_path: &Path) -> String {
    format!(
        "{} {} {}",
        shell_quote(&script.to_string_lossy()),
        binary_type.as_str(),
        shell_quote(&binary_path.to_string_lossy())
    )
}

/// Run the selected scripts in order, stopping at the first non-zero status.
///
/// Returns `0` when every script succeeded, otherwise the failing script's exact status.
#[tracing::instrument(skip_all, fields(count = tests.len(), binary_type = binary_type.as_str()))]
pub fn run_test_scripts(
    tests: &[(String, PathBuf)],
    binary_type: SolcBinaryType,
    binary_path: &Path,
    executor: &dyn ScriptExecutor,
    reporter: &mut dyn TestReporter,
) -> Result<i32, ExternalTestError> {
    for (name, script) in tests {
        reporter.on_test_start(name);
        let status = executor.run_command(&build_command_line(script, binary_type, binary_path))?;
        reporter.on_test_finished(name, status);
        if status != 0 {
            return Ok(status);
        }
    }
    Ok(0)
}
