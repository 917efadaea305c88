//! Integration with test frameworks through a minimal reporting handle.
//!
//! [`Reporter`] is the seam between snapshot comparison and whatever runs the
//! tests: a handle supplies the current test identifier and receives failures,
//! instead of this crate inspecting the call stack at runtime. The stock
//! [`PanicReporter`] covers plain `#[test]` functions, where a panic is how
//! failure is reported.

use crate::config::Config;
use crate::serialize::SnapshotValue;
use crate::store::normalize_snapshot_name;

/// The surface a test handle must expose for snapshot reporting.
pub trait Reporter {
    /// Marks the enclosing call as test plumbing. No-op unless the handle
    /// supports the distinction.
    fn helper(&mut self) {}

    /// Whether the test has already failed. Comparisons are skipped when it
    /// has, so one broken assertion does not cascade into fixture noise.
    fn failed(&self) -> bool {
        false
    }

    /// Records a failure and lets the test continue.
    fn error(&mut self, message: &str);

    /// Records a failure and aborts the test.
    fn fatal(&mut self, message: &str);

    /// Identifier of the running test, used to derive the snapshot name.
    fn name(&self) -> String;
}

impl Config {
    /// Compares `values` against the snapshot named after `t`, reporting any
    /// failure through the handle instead of returning it.
    ///
    /// Snapshot disagreements (missing fixture, mismatch, update notices) go
    /// through [`Reporter::error`]; environment failures (I/O, directory
    /// creation, serialization) abort via [`Reporter::fatal`].
    pub fn report<R: Reporter + ?Sized>(&self, t: &mut R, values: &[SnapshotValue]) {
        t.helper();
        if t.failed() {
            return;
        }
        let name = normalize_snapshot_name(&t.name());
        if let Err(err) = self.snapshot_multi(&name, values) {
            let message = err.to_string();
            if err.is_fatal() {
                t.fatal(&message);
            } else {
                t.error(&message);
            }
        }
    }
}

/// Stock reporter for plain `#[test]` functions: carries an explicit test
/// identifier and panics on any failure.
#[derive(Debug, Clone)]
pub struct PanicReporter {
    name: String,
}

impl PanicReporter {
    /// Creates a reporter for the given test identifier. Pair with
    /// [`test_name!`](crate::test_name) to derive the identifier from the
    /// enclosing function.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Reporter for PanicReporter {
    fn error(&mut self, message: &str) {
        panic!("{message}");
    }

    fn fatal(&mut self, message: &str) {
        panic!("{message}");
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
