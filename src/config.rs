//! Snapshot configuration and its builder-style configurators.

use std::env;
use std::path::PathBuf;

use crate::error::SnapshotError;
use crate::serialize::{FormatConfig, SnapshotValue};

/// Environment variable that switches the default behavior from
/// fail-on-mismatch to update mode. Any value counts; only presence matters.
pub const UPDATE_ENV_VARIABLE: &str = "UPDATE_SNAPSHOTS";

/// Per-test-context snapshot configuration.
///
/// Constructed once, read-only during comparisons. Every `with_*` configurator
/// consumes the value and returns a modified copy, so configs compose:
///
/// ```rust,no_run
/// use snapfile::Config;
///
/// let config = Config::new()
///     .with_snapshot_subdirectory("testdata/snapshots")
///     .with_fail_on_update(false);
/// config.snapshot_multi("my-test", &["output".into()]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) sub_dir_name: PathBuf,
    pub(crate) snapshot_file_extension: String,
    pub(crate) fail_on_update: bool,
    pub(crate) should_update: bool,
    pub(crate) format: FormatConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sub_dir_name: PathBuf::from(".snapshots"),
            snapshot_file_extension: ".snap".to_string(),
            fail_on_update: true,
            should_update: env_variable_set(UPDATE_ENV_VARIABLE),
            format: FormatConfig::default(),
        }
    }
}

impl Config {
    /// Creates a configuration with the default settings: fixtures under
    /// `.snapshots/` with a `.snap` extension, failing on update, and update
    /// mode driven by [`UPDATE_ENV_VARIABLE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory the fixture files live in. May be relative or absolute.
    pub fn with_snapshot_subdirectory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sub_dir_name = dir.into();
        self
    }

    /// Extension appended to every fixture file name.
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.snapshot_file_extension = extension.into();
        self
    }

    /// Whether writing a fixture in update mode is itself reported as a
    /// failure. Defaults to true so CI catches accidental fixture changes.
    pub fn with_fail_on_update(mut self, fail_on_update: bool) -> Self {
        self.fail_on_update = fail_on_update;
        self
    }

    /// Forces update mode on or off, overriding the environment.
    pub fn with_update(mut self, should_update: bool) -> Self {
        self.should_update = should_update;
        self
    }

    /// Reads update mode from a differently named environment variable.
    pub fn with_env_variable(mut self, name: &str) -> Self {
        self.should_update = env_variable_set(name);
        self
    }

    /// Replaces the structural-dump formatting settings.
    pub fn with_format(mut self, format: FormatConfig) -> Self {
        self.format = format;
        self
    }

    /// Compares `values` against the snapshot stored under `name`.
    ///
    /// Outside update mode this is read-only: a missing fixture fails with
    /// [`SnapshotError::NotFound`], differing content with
    /// [`SnapshotError::Mismatch`]. In update mode the fixture is written and
    /// the call fails with [`SnapshotError::Created`] or
    /// [`SnapshotError::Updated`] unless `fail_on_update` is off.
    pub fn snapshot_multi(
        &self,
        name: &str,
        values: &[SnapshotValue],
    ) -> Result<(), SnapshotError> {
        self.compare_or_update(name, values)
    }
}

fn env_variable_set(name: &str) -> bool {
    env::var_os(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_layout() {
        let config = Config::new();
        assert_eq!(config.sub_dir_name, PathBuf::from(".snapshots"));
        assert_eq!(config.snapshot_file_extension, ".snap");
        assert!(config.fail_on_update);
    }

    #[test]
    fn configurators_compose() {
        let config = Config::new()
            .with_snapshot_subdirectory("fixtures")
            .with_file_extension(".golden")
            .with_fail_on_update(false)
            .with_update(true);
        assert_eq!(config.sub_dir_name, PathBuf::from("fixtures"));
        assert_eq!(config.snapshot_file_extension, ".golden");
        assert!(!config.fail_on_update);
        assert!(config.should_update);
    }

    #[test]
    fn unset_env_variable_leaves_update_mode_off() {
        let config = Config::new().with_env_variable("SNAPFILE_TEST_VAR_THAT_IS_NEVER_SET");
        assert!(!config.should_update);
    }
}
