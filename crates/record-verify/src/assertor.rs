//! Key-grouped streaming comparison of two sorted record streams.
//!
//! Both streams must arrive in non-decreasing key order under the same
//! configuration. The assertor walks them in lock-step one key group at a
//! time, hands each pair of groups to the configuration's matcher and stops
//! at the first group that does not match. Only the current group of each
//! side is held in memory.
//!
//! A group is the maximal run of expected records sharing a key. The first
//! record with a different key is held over as the seed of the next group;
//! the same applies to the actual side.

use crate::config::TypeConfig;
use crate::error::VerifyError;
use crate::key::DisplayKey;
use crate::render::{stringify, PREVIEW_LIMIT};
use crate::report::VerificationReport;
use crate::sort::RecordStream;
use record_core::{Record, Value};
use std::iter;
use std::time::Instant;
use tracing::{debug, info};

/// Groups between progress log lines.
const PROGRESS_INTERVAL: u64 = 1000;

/// Compares an expected and an actual sorted stream.
pub struct StreamingAssertor<'a> {
    config: &'a TypeConfig,
}

/// One side of the comparison with its held-over record.
struct Side {
    records: RecordStream,
    held: Option<Record>,
    consumed: u64,
}

impl Side {
    fn new(mut records: RecordStream) -> Result<Self, VerifyError> {
        let held = records.next().transpose()?;
        Ok(Self {
            records,
            held,
            consumed: 0,
        })
    }

    fn take(&mut self) -> Result<Option<Record>, VerifyError> {
        let Some(record) = self.held.take() else {
            return Ok(None);
        };
        self.held = self.records.next().transpose()?;
        self.consumed += 1;
        Ok(Some(record))
    }

    /// Move every leading record with `key` into `group`.
    fn take_group(
        &mut self,
        config: &TypeConfig,
        key: &[Value],
        group: &mut Vec<Record>,
    ) -> Result<(), VerifyError> {
        while self
            .held
            .as_ref()
            .is_some_and(|r| config.key_extractor().has_key(r, key))
        {
            if let Some(record) = self.take()? {
                group.push(record);
            }
        }
        Ok(())
    }

    /// Preview of everything not yet consumed.
    fn remaining(&mut self, config: &TypeConfig) -> Result<String, VerifyError> {
        let mut pending = Vec::with_capacity(PREVIEW_LIMIT + 1);
        pending.extend(self.held.take());
        for record in self.records.by_ref().take(PREVIEW_LIMIT) {
            pending.push(record?);
        }
        Ok(stringify(config.renderer(), &pending))
    }
}

impl<'a> StreamingAssertor<'a> {
    pub fn new(config: &'a TypeConfig) -> Self {
        Self { config }
    }

    /// Compare the two streams, failing at the first mismatching key group.
    pub fn assert_equals(
        &self,
        expected: RecordStream,
        actual: RecordStream,
    ) -> Result<VerificationReport, VerifyError> {
        let start = Instant::now();
        let renderer = self.config.renderer();
        let mut expected = Side::new(expected)?;
        let mut actual = Side::new(actual)?;
        let mut groups = 0u64;

        while let Some(first) = expected.take()? {
            let position = expected.consumed - 1;
            let key = self.config.key_extractor().extract(&first);

            let mut expected_group = vec![first];
            expected.take_group(self.config, &key, &mut expected_group)?;
            let mut actual_group = Vec::new();
            actual.take_group(self.config, &key, &mut actual_group)?;

            if actual_group.is_empty() {
                return Err(VerifyError::NoValueForKey {
                    key: DisplayKey(&key).to_string(),
                    position,
                    expected: stringify(renderer, &expected_group),
                    actual: actual
                        .held
                        .as_ref()
                        .map(|r| renderer.render(r))
                        .unwrap_or_else(|| "none".to_string()),
                });
            }

            let residue = self.config.matcher().remove_matching_values(
                self.config,
                expected_group,
                actual_group,
            );
            match (residue.expected.is_empty(), residue.actual.is_empty()) {
                (true, true) => {}
                (false, true) => {
                    return Err(VerifyError::MoreElementsExpected {
                        key: Some(DisplayKey(&key).to_string()),
                        remaining: stringify(renderer, &residue.expected),
                    })
                }
                (true, false) => {
                    return Err(VerifyError::LessElementsExpected {
                        key: Some(DisplayKey(&key).to_string()),
                        remaining: stringify(renderer, &residue.actual),
                    })
                }
                (false, false) => {
                    return Err(VerifyError::UnmatchedValues {
                        key: DisplayKey(&key).to_string(),
                        position,
                        expected: stringify(renderer, &residue.expected),
                        actual: stringify(renderer, &residue.actual),
                    })
                }
            }

            groups += 1;
            if groups % PROGRESS_INTERVAL == 0 {
                debug!(
                    "Matched {groups} key groups ({} expected records)",
                    expected.consumed
                );
            }
        }

        if actual.held.is_some() {
            return Err(VerifyError::LessElementsExpected {
                key: None,
                remaining: actual.remaining(self.config)?,
            });
        }

        let report = VerificationReport {
            groups,
            expected_records: expected.consumed,
            actual_records: actual.consumed,
            total_duration: start.elapsed(),
        };
        info!(
            "Matched {} key groups: {} expected, {} actual records",
            report.groups, report.expected_records, report.actual_records
        );
        Ok(report)
    }
}

/// Compare two in-memory record lists that are already in key order.
pub fn assert_sorted_equals(
    config: &TypeConfig,
    expected: Vec<Record>,
    actual: Vec<Record>,
) -> Result<VerificationReport, VerifyError> {
    StreamingAssertor::new(config).assert_equals(
        Box::new(expected.into_iter().map(Ok)),
        Box::new(actual.into_iter().map(Ok)),
    )
}

/// Empty record stream.
pub fn empty_stream() -> RecordStream {
    Box::new(iter::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_core::{record, FieldType, Schema};
    use std::io;

    fn config() -> TypeConfig {
        TypeConfig::for_schema(Schema::of_types(&[FieldType::Int, FieldType::Text]))
    }

    #[test]
    fn test_equal_streams_pass() {
        let report = assert_sorted_equals(
            &config(),
            vec![record![1, "a"], record![1, "a"], record![2, "b"]],
            vec![record![1, "a"], record![1, "a"], record![2, "b"]],
        )
        .unwrap();
        assert_eq!(report.groups, 2);
        assert_eq!(report.expected_records, 3);
        assert_eq!(report.actual_records, 3);
    }

    #[test]
    fn test_both_empty_pass() {
        let report = StreamingAssertor::new(&config())
            .assert_equals(empty_stream(), empty_stream())
            .unwrap();
        assert_eq!(report.groups, 0);
    }

    #[test]
    fn test_missing_key_reports_position_and_next_actual() {
        let err = assert_sorted_equals(
            &config(),
            vec![record![1, "a"], record![2, "b"], record![2, "b"]],
            vec![record![1, "a"], record![3, "c"]],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No value for key [2, b] @ 1, expected: (2, b), (2, b), but was: (3, c)"
        );
    }

    #[test]
    fn test_missing_key_at_end_of_actual() {
        let err = assert_sorted_equals(&config(), vec![record![1, "a"]], vec![]).unwrap_err();
        match err {
            VerifyError::NoValueForKey {
                position, actual, ..
            } => {
                assert_eq!(position, 0);
                assert_eq!(actual, "none");
            }
            other => panic!("Expected NoValueForKey, got {other:?}"),
        }
    }

    #[test]
    fn test_surplus_expected_in_group() {
        let err = assert_sorted_equals(
            &config(),
            vec![record![1, "x"], record![1, "x"]],
            vec![record![1, "x"]],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "More elements expected for key [1, x]: (1, x)"
        );
    }

    #[test]
    fn test_surplus_actual_in_group() {
        let err = assert_sorted_equals(
            &config(),
            vec![record![1, "x"]],
            vec![record![1, "x"], record![1, "x"]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::LessElementsExpected { key: Some(_), .. }
        ));
    }

    #[test]
    fn test_unmatched_values_render_both_residues() {
        let config = TypeConfig::for_schema(Schema::of_types(&[FieldType::Int, FieldType::Double]))
            .with_double_delta(0.1);
        let err = assert_sorted_equals(&config, vec![record![1, 50.0]], vec![record![1, 50.2]])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unmatched values for key [1] @ 0, expected: (1, 50), but was: (1, 50.2)"
        );
    }

    #[test]
    fn test_trailing_actual_records() {
        let actual: Vec<Record> = (0..30).map(|i| record![5, format!("v{i:02}")]).collect();
        let err = assert_sorted_equals(&config(), vec![], actual).unwrap_err();
        match err {
            VerifyError::LessElementsExpected { key, remaining } => {
                assert!(key.is_none());
                assert!(remaining.starts_with("(5, v00), (5, v01)"));
                assert!(remaining.ends_with("..."));
            }
            other => panic!("Expected LessElementsExpected, got {other:?}"),
        }
    }

    #[test]
    fn test_stream_error_aborts() {
        let expected: RecordStream = Box::new(
            vec![
                Ok(record![1, "a"]),
                Err(VerifyError::io("expected.jsonl", io::Error::other("truncated"))),
            ]
            .into_iter(),
        );
        let err = StreamingAssertor::new(&config())
            .assert_equals(expected, Box::new(vec![Ok(record![1, "a"])].into_iter()))
            .unwrap_err();
        assert!(matches!(err, VerifyError::Io { .. }));
    }
}
