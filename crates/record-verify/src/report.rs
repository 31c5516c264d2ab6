//! Verification report types.

use std::time::Duration;

/// Outcome of a successful comparison.
///
/// Failed comparisons surface as [`crate::VerifyError`]; a report always
/// describes two streams that were found equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    /// Number of key groups compared.
    pub groups: u64,
    /// Records read from the expected side.
    pub expected_records: u64,
    /// Records read from the actual side.
    pub actual_records: u64,
    /// Total comparison time, including sorting.
    pub total_duration: Duration,
}

impl VerificationReport {
    /// Calculate verification rate (expected records per second).
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.expected_records as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Merge the counts of another comparison into this one.
    pub fn absorb(&mut self, other: &VerificationReport) {
        self.groups += other.groups;
        self.expected_records += other.expected_records;
        self.actual_records += other.actual_records;
        self.total_duration += other.total_duration;
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Verification PASSED: {} expected and {} actual records in {} key groups ({:?})",
            self.expected_records, self.actual_records, self.groups, self.total_duration
        )
    }
}
