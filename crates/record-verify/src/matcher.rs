//! Pairing of same-keyed expected and actual records.
//!
//! A matcher receives the expected and actual records of one key group and
//! returns whatever it could not pair up. An empty [`Residue`] means the
//! group matched.

use crate::config::TypeConfig;
use crate::distance::TypeDistance;
use crate::equality::Equaler;
use record_core::Record;
use std::fmt;
use std::sync::Arc;

/// Records left over after matching one key group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Residue {
    pub expected: Vec<Record>,
    pub actual: Vec<Record>,
}

impl Residue {
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty() && self.actual.is_empty()
    }
}

/// Removes matched pairs from two bags of records sharing one key.
pub trait FuzzyValueMatcher: Send + Sync + fmt::Debug {
    fn remove_matching_values(
        &self,
        config: &TypeConfig,
        expected: Vec<Record>,
        actual: Vec<Record>,
    ) -> Residue;
}

/// Exact, one-to-one matching.
///
/// Each actual record is paired with the first still-unpaired expected
/// record it equals. Matching stops once either side runs out.
#[derive(Debug, Clone)]
pub struct EqualityValueMatcher {
    equaler: Arc<dyn Equaler>,
}

impl EqualityValueMatcher {
    pub fn new(equaler: Arc<dyn Equaler>) -> Self {
        Self { equaler }
    }
}

impl FuzzyValueMatcher for EqualityValueMatcher {
    fn remove_matching_values(
        &self,
        _config: &TypeConfig,
        mut expected: Vec<Record>,
        actual: Vec<Record>,
    ) -> Residue {
        let mut unmatched_actual = Vec::new();
        let mut actual = actual.into_iter();

        while !expected.is_empty() {
            let Some(record) = actual.next() else {
                break;
            };
            match expected.iter().position(|e| self.equaler.equal(&record, e)) {
                Some(pos) => {
                    expected.remove(pos);
                }
                None => unmatched_actual.push(record),
            }
        }
        unmatched_actual.extend(actual);

        Residue {
            expected,
            actual: unmatched_actual,
        }
    }
}

/// Approximate matching by record distance.
///
/// Every expected record is compared with every actual record. An expected
/// record is removed when at least one actual record is within distance, and
/// every actual record within distance of some expected record is removed.
/// One expected record may therefore absorb several actual duplicates, while
/// an actual record may satisfy several expected ones.
#[derive(Debug, Clone)]
pub struct NaiveFuzzyValueMatcher {
    distance: Arc<dyn TypeDistance>,
}

impl NaiveFuzzyValueMatcher {
    pub fn new(distance: Arc<dyn TypeDistance>) -> Self {
        Self { distance }
    }

    pub fn type_distance(&self) -> &Arc<dyn TypeDistance> {
        &self.distance
    }
}

impl FuzzyValueMatcher for NaiveFuzzyValueMatcher {
    fn remove_matching_values(
        &self,
        config: &TypeConfig,
        expected: Vec<Record>,
        actual: Vec<Record>,
    ) -> Residue {
        let mut matched_actual = vec![false; actual.len()];
        let mut unmatched_expected = Vec::new();

        for e in expected {
            let mut matched = false;
            for (a, used) in actual.iter().zip(matched_actual.iter_mut()) {
                if self.distance.distance(config, &e, a) >= 0.0 {
                    matched = true;
                    *used = true;
                }
            }
            if !matched {
                unmatched_expected.push(e);
            }
        }

        let unmatched_actual = actual
            .into_iter()
            .zip(matched_actual)
            .filter_map(|(a, used)| (!used).then_some(a))
            .collect();

        Residue {
            expected: unmatched_expected,
            actual: unmatched_actual,
        }
    }
}
