//! Fixture storage: name normalization, reads, and the compare-or-update
//! cycle.
//!
//! Every comparison is one synchronous pass: read the prior fixture,
//! serialize the incoming values, compare, and (in update mode only) write.
//! There is no locking; concurrent access to one snapshot name is the
//! caller's responsibility.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::Config;
use crate::diff::unified_diff;
use crate::error::SnapshotError;
use crate::serialize::{take_legacy_snapshot, take_snapshot, SnapshotValue};

/// Context lines around each change in reported diffs.
const DIFF_CONTEXT: usize = 1;

/// Normalizes a test identifier into a filesystem-safe snapshot name.
///
/// Module-path separators, slashes, dots, and spaces all become single
/// hyphens, so `my_crate::io::reads_header` stores as
/// `my_crate-io-reads_header`.
pub fn normalize_snapshot_name(raw: &str) -> String {
    raw.replace("::", "-").replace(['/', '.', ' '], "-")
}

impl Config {
    /// Full path of the fixture file for `name` under this configuration.
    pub(crate) fn snapshot_file_path(&self, name: &str) -> PathBuf {
        self.sub_dir_name
            .join(format!("{name}{}", self.snapshot_file_extension))
    }

    /// Reads the stored fixture. Absence is reported as
    /// [`SnapshotError::NotFound`] so callers can tell a first run from a
    /// genuine read failure.
    pub(crate) fn read_snapshot(&self, name: &str) -> Result<String, SnapshotError> {
        match fs::read_to_string(self.snapshot_file_path(name)) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(SnapshotError::NotFound {
                name: name.to_string(),
            }),
            Err(source) => Err(SnapshotError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }

    /// Writes `content` as the fixture for `name`, creating the snapshot
    /// directory first. With `fail_on_update` off this succeeds quietly
    /// (after a console notice); otherwise it fails with `Created` or
    /// `Updated` so CI treats any fixture change as a build failure while
    /// the new content still lands on disk for local inspection.
    pub(crate) fn update_snapshot(
        &self,
        name: &str,
        content: &str,
    ) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.sub_dir_name).map_err(SnapshotError::CreateDir)?;

        let path = self.snapshot_file_path(name);
        let is_new = !path.exists();
        fs::write(&path, content).map_err(|source| SnapshotError::Io {
            name: name.to_string(),
            source,
        })?;

        if !self.fail_on_update {
            println!("snapshot updated: {name}");
            return Ok(());
        }
        if is_new {
            Err(SnapshotError::Created {
                name: name.to_string(),
            })
        } else {
            Err(SnapshotError::Updated {
                name: name.to_string(),
            })
        }
    }

    /// One full comparison. All outcomes are terminal; the caller decides
    /// whether to re-invoke.
    pub(crate) fn compare_or_update(
        &self,
        name: &str,
        values: &[SnapshotValue],
    ) -> Result<(), SnapshotError> {
        let current = take_snapshot(values, &self.format);

        if self.should_update {
            return self.update_snapshot(name, &current);
        }

        let previous = self.read_snapshot(name)?;
        if previous == current {
            return Ok(());
        }
        // Fixtures written by the legacy format dump every value, including
        // plain text and bytes. Retry under that encoding before failing.
        if previous == take_legacy_snapshot(values, &self.format) {
            return Ok(());
        }
        Err(SnapshotError::Mismatch {
            name: name.to_string(),
            diff: unified_diff(&previous, &current, DIFF_CONTEXT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_path_separators() {
        assert_eq!(
            normalize_snapshot_name("my_crate::io::reads_header"),
            "my_crate-io-reads_header"
        );
        assert_eq!(normalize_snapshot_name("pkg.TestThing/case"), "pkg-TestThing-case");
        assert_eq!(normalize_snapshot_name("plain-name"), "plain-name");
    }

    #[test]
    fn file_path_joins_directory_name_and_extension() {
        let config = Config::new()
            .with_snapshot_subdirectory("fixtures")
            .with_file_extension(".golden");
        assert_eq!(
            config.snapshot_file_path("my-test"),
            PathBuf::from("fixtures/my-test.golden")
        );
    }

    #[test]
    fn distinct_names_resolve_to_distinct_paths() {
        let config = Config::new();
        assert_ne!(
            config.snapshot_file_path("test-one"),
            config.snapshot_file_path("test-two")
        );
    }
}
