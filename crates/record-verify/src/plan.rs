//! Named expected and actual outputs checked together.

use crate::config::TypeConfig;
use crate::error::VerifyError;
use crate::report::VerificationReport;
use crate::source::RecordSource;
use record_core::Schema;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A set of named outputs, each with an expected and an actual side.
///
/// Sources are created on first access and inherit the plan's default
/// configuration.
#[derive(Debug, Default)]
pub struct VerificationPlan {
    default_config: Option<TypeConfig>,
    expected: BTreeMap<String, RecordSource>,
    actual: BTreeMap<String, RecordSource>,
}

impl VerificationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_config(config: TypeConfig) -> Self {
        Self {
            default_config: Some(config),
            ..Self::default()
        }
    }

    pub fn default_config(&self) -> Option<&TypeConfig> {
        self.default_config.as_ref()
    }

    fn source_for(default_config: Option<&TypeConfig>) -> RecordSource {
        match default_config {
            Some(config) => RecordSource::with_config(config.clone()),
            None => RecordSource::new(),
        }
    }

    /// The expected records of output `name`.
    pub fn expected_output(&mut self, name: &str) -> &mut RecordSource {
        let default_config = self.default_config.as_ref();
        self.expected
            .entry(name.to_string())
            .or_insert_with(|| Self::source_for(default_config))
    }

    /// The actual records of output `name`.
    pub fn actual_output(&mut self, name: &str) -> &mut RecordSource {
        let default_config = self.default_config.as_ref();
        self.actual
            .entry(name.to_string())
            .or_insert_with(|| Self::source_for(default_config))
    }

    /// Names of every output with expected records.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.expected.keys().map(String::as_str)
    }

    /// Compare every expected output with its actual output, in name order.
    ///
    /// Uninitialized expected outputs are skipped. The first failing output
    /// aborts verification.
    pub fn verify(&mut self) -> Result<VerificationReport, VerifyError> {
        let mut total = VerificationReport::default();
        let mut verified = 0usize;

        for (name, expected) in self.expected.iter_mut() {
            if expected.type_config().is_none() {
                match self.default_config.clone().or_else(|| inferred_config(name, expected)) {
                    Some(config) => {
                        expected.set_type_config(config);
                    }
                    None => {
                        return Err(VerifyError::Configuration(format!(
                            "no type configuration for output '{name}'"
                        )))
                    }
                }
            }

            if !expected.is_initialized() {
                debug!("Skipping output '{name}' without expected records");
                continue;
            }

            let actual = self
                .actual
                .entry(name.clone())
                .or_insert_with(RecordSource::new);
            let report = actual.assert_equals(expected).map_err(|e| match e {
                VerifyError::Configuration(msg) => {
                    VerifyError::Configuration(format!("output '{name}': {msg}"))
                }
                other => other,
            })?;
            debug!("Output '{name}' matched: {}", report.summary());
            total.absorb(&report);
            verified += 1;
        }

        info!("Verified {verified} outputs: {}", total.summary());
        Ok(total)
    }
}

/// Configuration derived from the first in-memory record.
fn inferred_config(name: &str, source: &RecordSource) -> Option<TypeConfig> {
    if !source.is_adhoc() {
        return None;
    }
    let first = source.records().ok()?.next()?.ok()?;
    debug!("Inferring schema for output '{name}' from {first}");
    Some(TypeConfig::for_schema(Schema::infer(name, &first)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_core::{record, FieldType};

    fn config() -> TypeConfig {
        TypeConfig::for_schema(Schema::of_types(&[FieldType::Int, FieldType::Text]))
    }

    #[test]
    fn test_outputs_inherit_default_config() {
        let mut plan = VerificationPlan::with_default_config(config());
        assert!(plan.expected_output("out").type_config().is_some());
        assert!(plan.actual_output("out").type_config().is_some());
    }

    #[test]
    fn test_verify_all_outputs() {
        let mut plan = VerificationPlan::with_default_config(config());
        plan.expected_output("a").add(record![1, "x"]);
        plan.actual_output("a").add(record![1, "x"]);
        plan.expected_output("b").add(record![2, "y"]).add(record![3, "z"]);
        plan.actual_output("b").add(record![3, "z"]).add(record![2, "y"]);

        let report = plan.verify().unwrap();
        assert_eq!(report.expected_records, 3);
        assert_eq!(report.groups, 3);
    }

    #[test]
    fn test_uninitialized_expected_is_skipped() {
        let mut plan = VerificationPlan::with_default_config(config());
        plan.expected_output("unchecked");
        plan.actual_output("unchecked").add(record![1, "x"]);
        assert_eq!(plan.verify().unwrap().groups, 0);
    }

    #[test]
    fn test_missing_config_is_error() {
        let mut plan = VerificationPlan::new();
        plan.expected_output("out");
        let err = plan.verify().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'out'"));
    }

    #[test]
    fn test_adhoc_output_without_config_is_inferred() {
        let mut plan = VerificationPlan::new();
        plan.expected_output("out").add(record![1, "x"]);
        plan.actual_output("out").add(record![1, "x"]);
        plan.verify().unwrap();
    }

    #[test]
    fn test_first_failure_aborts() {
        let mut plan = VerificationPlan::with_default_config(config());
        plan.expected_output("a").add(record![1, "x"]);
        plan.expected_output("b").add(record![2, "y"]);
        plan.actual_output("b").add(record![2, "y"]);

        let err = plan.verify().unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_output_names_sorted() {
        let mut plan = VerificationPlan::new();
        plan.expected_output("z");
        plan.expected_output("a");
        assert_eq!(plan.output_names().collect::<Vec<_>>(), vec!["a", "z"]);
    }
}
