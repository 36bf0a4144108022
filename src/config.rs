//! Discovery configuration for external tests
//!
//! The tests directory is derived from the location of the running executable unless the caller overrides it.

use std::io;
use std::path::{Path, PathBuf};

/// Name of the directory holding external test scripts, next to the executable.
pub const EXTERNAL_TESTS_DIR_NAME: &str = "externalTests";

/// Discovery configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Directory scanned for test scripts (single level)
    pub tests_dir: PathBuf,
    /// Extension a file must carry to count as a test script (without the dot)
    pub script_extension: String,
    /// Shared-utility script stem that is never a test
    pub reserved_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            tests_dir: PathBuf::from(EXTERNAL_TESTS_DIR_NAME),
            script_extension: "sh".to_string(),
            reserved_name: "common".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Config rooted at the `externalTests` directory next to the running executable.
    pub fn from_current_exe() -> io::Result<Self> {
        Ok(Self::new().with_tests_dir(default_tests_dir()?))
    }

    /// Set the directory to scan
    pub fn with_tests_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tests_dir = dir.into();
        self
    }

    /// Set the script extension
    pub fn with_script_extension(mut self, extension: impl Into<String>) -> Self {
        self.script_extension = extension.into();
        self
    }

    /// Set the reserved shared-utility name
    pub fn with_reserved_name(mut self, name: impl Into<String>) -> Self {
        self.reserved_name = name.into();
        self
    }

    /// Whether a directory entry at `path` names a test script.
    ///
    /// Only the name is inspected here; the regular-file check belongs to discovery.
    pub fn matches_script(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.script_extension);
        has_extension && path.file_stem().is_some_and(|s| s != self.reserved_name.as_str())
    }
}

/// `<resolved executable dir>/externalTests`
pub fn default_tests_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?.canonicalize()?;
    let parent = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))?;
    Ok(parent.join(EXTERNAL_TESTS_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_script() {
        let config = DiscoveryConfig::new();
        assert!(config.matches_script(Path::new("/x/zeppelin.sh")));
        assert!(!config.matches_script(Path::new("/x/common.sh")));
        assert!(!config.matches_script(Path::new("/x/zeppelin.py")));
        assert!(!config.matches_script(Path::new("/x/zeppelin")));
        assert!(!config.matches_script(Path::new("/x/zeppelin.sh.bak")));
    }

    #[cfg(unix)]
    #[test]
    fn test_matches_script_leaves_non_utf8_stems_to_discovery() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let config = DiscoveryConfig::new();
        assert!(config.matches_script(Path::new(OsStr::from_bytes(b"bad\xff.sh"))));
    }

    #[test]
    fn test_builder_overrides() {
        let config = DiscoveryConfig::new()
            .with_tests_dir("/tmp/ext")
            .with_script_extension("bash")
            .with_reserved_name("shared");
        assert_eq!(config.tests_dir, PathBuf::from("/tmp/ext"));
        assert!(config.matches_script(Path::new("a.bash")));
        assert!(config.matches_script(Path::new("common.bash")));
        assert!(!config.matches_script(Path::new("shared.bash")));
    }

    #[test]
    fn test_default_tests_dir_is_next_to_executable() {
        let dir = default_tests_dir().unwrap();
        assert!(dir.ends_with(EXTERNAL_TESTS_DIR_NAME));
        assert!(dir.is_absolute());
    }
}
