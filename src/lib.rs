//! Snapshot testing: assert that a value looks like it did last time.
//!
//! Values are serialized to a deterministic textual form and persisted as
//! named fixture files. On later runs the freshly serialized value is
//! compared against the stored fixture, and a mismatch fails with a unified
//! diff. Setting the `UPDATE_SNAPSHOTS` environment variable switches to
//! update mode, which rewrites fixtures instead of failing on mismatch.
//!
//! ```rust,no_run
//! use snapfile::snapshot;
//!
//! #[test]
//! fn renders_greeting() {
//!     snapshot!("Hello, world!").unwrap();
//! }
//! ```
//!
//! The first run fails and asks for update mode; running once with
//! `UPDATE_SNAPSHOTS=1` writes `.snapshots/<test-name>.snap`, which is then
//! committed alongside the tests. Delete a fixture by hand when it becomes
//! obsolete; the crate never deletes files.
//!
//! Explicit names and custom layouts go through [`Config`]:
//!
//! ```rust,no_run
//! use snapfile::{Config, SnapshotValue};
//!
//! let config = Config::new().with_snapshot_subdirectory("testdata/snapshots");
//! config
//!     .snapshot_multi("parser-output", &[SnapshotValue::from("line one\nline two")])
//!     .unwrap();
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod report;
pub mod serialize;
pub mod store;

pub use config::{Config, UPDATE_ENV_VARIABLE};
pub use error::SnapshotError;
pub use report::{PanicReporter, Reporter};
pub use serialize::{FormatConfig, SnapshotValue};
pub use store::normalize_snapshot_name;

use once_cell::sync::Lazy;

static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

/// Compares `values` against the snapshot stored under `name`, using the
/// default configuration. See [`Config::snapshot_multi`].
pub fn snapshot_multi(name: &str, values: &[SnapshotValue]) -> Result<(), SnapshotError> {
    DEFAULT_CONFIG.snapshot_multi(name, values)
}

/// Runs a comparison through a test handle using the default configuration.
/// See [`Config::report`].
pub fn report<R: Reporter + ?Sized>(t: &mut R, values: &[SnapshotValue]) {
    DEFAULT_CONFIG.report(t, values);
}

/// Expands to the normalized, fully qualified name of the enclosing function.
///
/// Resolved at compile time from the function's type path; there is no
/// runtime stack inspection. Two different test functions always produce two
/// different names.
#[macro_export]
macro_rules! test_name {
    () => {{
        fn here() {}
        fn name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::normalize_snapshot_name(name_of(here).trim_end_matches("::here"))
    }};
}

/// Compares the given values against a snapshot named after the enclosing
/// test function, using the default configuration.
///
/// Each argument is converted via `Into<SnapshotValue>`; wrap arbitrary
/// serializable values with [`SnapshotValue::structured`] first.
#[macro_export]
macro_rules! snapshot {
    ($($value:expr),+ $(,)?) => {
        $crate::snapshot_multi(&$crate::test_name!(), &[$($crate::SnapshotValue::from($value)),+])
    };
}
