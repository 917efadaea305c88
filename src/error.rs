//! Unified error type for every snapshot failure mode.
//!
//! All store and comparison operations return [`SnapshotError`]; nothing is
//! swallowed or retried. The variants split into two families: snapshot
//! disagreements ([`NotFound`](SnapshotError::NotFound),
//! [`Mismatch`](SnapshotError::Mismatch), and the update notices) and
//! environment failures (I/O, directory creation, serialization). The
//! [`Reporter`](crate::Reporter) integration routes the first family through
//! `error` and the second through `fatal`.

use miette::Diagnostic;
use thiserror::Error;

/// Everything that can go wrong while taking, reading, or comparing a snapshot.
#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    /// No fixture file exists for this snapshot name. Expected on the first
    /// run of a new test; the fixture is not created outside update mode.
    #[error("snapshot not found for test {name}, please run tests in update mode to create it")]
    #[diagnostic(
        code(snapfile::not_found),
        help("re-run with the UPDATE_SNAPSHOTS environment variable set to create the fixture")
    )]
    NotFound {
        /// Resolved snapshot name.
        name: String,
    },

    /// Reading or writing the fixture file failed for a reason other than
    /// absence (permissions, disk, etc.). Surfaced verbatim as the source.
    #[error("could not access snapshot for test {name}")]
    #[diagnostic(code(snapfile::io))]
    Io {
        /// Resolved snapshot name.
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot directory could not be created in update mode.
    #[error("could not create snapshots directory")]
    #[diagnostic(code(snapfile::create_dir))]
    CreateDir(#[source] std::io::Error),

    /// A value could not be converted into its structural representation.
    #[error("could not serialize value for snapshot")]
    #[diagnostic(code(snapfile::serialize))]
    Serialize(#[from] serde_json::Error),

    /// Stored and current content differ under both serialization formats.
    /// Carries a unified diff of previous versus current content.
    #[error("snapshot mismatch for test {name}:\n{diff}")]
    #[diagnostic(
        code(snapfile::mismatch),
        help("re-run with the UPDATE_SNAPSHOTS environment variable set to accept the new content")
    )]
    Mismatch {
        /// Resolved snapshot name.
        name: String,
        /// Unified diff, `Previous` versus `Current`.
        diff: String,
    },

    /// A fixture was written for the first time and the configuration treats
    /// updates as failures.
    #[error("snapshot created for test {name}")]
    #[diagnostic(code(snapfile::created))]
    Created {
        /// Resolved snapshot name.
        name: String,
    },

    /// An existing fixture was overwritten and the configuration treats
    /// updates as failures.
    #[error("snapshot updated for test {name}")]
    #[diagnostic(code(snapfile::updated))]
    Updated {
        /// Resolved snapshot name.
        name: String,
    },
}

impl SnapshotError {
    /// True for failures that indicate a broken environment rather than a
    /// snapshot disagreement. Fatal errors abort the test via
    /// [`Reporter::fatal`](crate::Reporter::fatal); the rest are ordinary
    /// assertion failures.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::CreateDir(_) | Self::Serialize(_)
        )
    }
}
