//! Error types for the record verifier.

use record_core::SchemaError;
use record_generator::GeneratorError;
use std::io;
use thiserror::Error;

/// Errors that can occur during verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Missing or inconsistent type configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading or writing a record source failed.
    #[error("I/O error on {source_desc}: {source}")]
    Io {
        source_desc: String,
        #[source]
        source: io::Error,
    },

    /// Schema could not be loaded.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Data generator error.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The actual stream has no records for a key the expected stream has.
    #[error("No value for key {key} @ {position}, expected: {expected}, but was: {actual}")]
    NoValueForKey {
        key: String,
        position: u64,
        expected: String,
        actual: String,
    },

    /// Records at the same position of two ordered streams differ.
    #[error("Mismatch @ {position}, expected: {expected}, but was: {actual}")]
    ValueMismatch {
        position: u64,
        expected: String,
        actual: String,
    },

    /// Records of one key group could not be paired up.
    #[error("Unmatched values for key {key} @ {position}, expected: {expected}, but was: {actual}")]
    UnmatchedValues {
        key: String,
        position: u64,
        expected: String,
        actual: String,
    },

    /// Expected records remain after the actual side was used up.
    #[error("More elements expected{}: {remaining}", for_key(.key))]
    MoreElementsExpected {
        key: Option<String>,
        remaining: String,
    },

    /// Actual records remain after the expected side was used up.
    #[error("Less elements expected{}: {remaining}", for_key(.key))]
    LessElementsExpected {
        key: Option<String>,
        remaining: String,
    },

    /// One or more resources failed to release.
    #[error("exception(s) while closing: {}", join_failures(.failures))]
    Close { failures: Vec<io::Error> },
}

fn for_key(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" for key {k}"))
        .unwrap_or_default()
}

fn join_failures(failures: &[io::Error]) -> String {
    let parts: Vec<String> = failures.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

impl VerifyError {
    /// Attach a source description to an I/O error.
    pub fn io(source_desc: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            source_desc: source_desc.into(),
            source,
        }
    }

    /// Whether this error is a structural mismatch between the two streams.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            Self::NoValueForKey { .. }
                | Self::ValueMismatch { .. }
                | Self::UnmatchedValues { .. }
                | Self::MoreElementsExpected { .. }
                | Self::LessElementsExpected { .. }
        )
    }

    /// Whether this error is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_messages() {
        let err = VerifyError::MoreElementsExpected {
            key: Some("[1]".to_string()),
            remaining: "(1, x)".to_string(),
        };
        assert_eq!(err.to_string(), "More elements expected for key [1]: (1, x)");
        assert!(err.is_mismatch());

        let err = VerifyError::LessElementsExpected {
            key: None,
            remaining: "(1, x)".to_string(),
        };
        assert_eq!(err.to_string(), "Less elements expected: (1, x)");
    }

    #[test]
    fn test_close_lists_every_failure() {
        let err = VerifyError::Close {
            failures: vec![io::Error::other("first"), io::Error::other("second")],
        };
        let message = err.to_string();
        assert!(message.contains("first"));
        assert!(message.contains("second"));
        assert!(!err.is_mismatch());
    }

    #[test]
    fn test_configuration_predicate() {
        assert!(VerifyError::Configuration("missing".into()).is_configuration());
        assert!(!VerifyError::io("file", io::Error::other("boom")).is_configuration());
    }
}
