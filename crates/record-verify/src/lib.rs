//! Streaming bag-equality verification of typed record streams.
//!
//! This crate decides whether an actual set of records equals an expected
//! set under multiset semantics, without holding either set in memory. Both
//! sides are sorted by key, walked in lock-step one key group at a time, and
//! each group is matched either exactly or within a numeric tolerance.
//!
//! # Architecture
//!
//! ```text
//! RecordSource ──sorted_view──> SortMerger ──> StreamingAssertor
//!  (ad-hoc / files /             (in memory       │
//!   generated)                    or spilled)     ▼
//!                                          FuzzyValueMatcher
//!                                          (Equaler / RecordDistance)
//! ```
//!
//! Every comparison is parameterized by one [`TypeConfig`].
//!
//! # Example
//!
//! ```
//! use record_core::{record, FieldType, Schema};
//! use record_verify::{RecordSource, TypeConfig};
//!
//! let config = TypeConfig::for_schema(Schema::of_types(&[FieldType::Int, FieldType::Double]))
//!     .with_double_delta(0.5);
//!
//! let mut expected = RecordSource::with_config(config.clone());
//! expected.add(record![1, 50.0]).add(record![2, 10.0]);
//!
//! let mut actual = RecordSource::with_config(config);
//! actual.add(record![2, 10.1]).add(record![1, 50.2]);
//!
//! let report = actual.assert_equals(&mut expected).unwrap();
//! assert_eq!(report.groups, 2);
//! ```

pub mod args;
pub mod assertor;
pub mod closer;
pub mod config;
pub mod distance;
pub mod equality;
pub mod error;
pub mod format;
pub mod generated;
pub mod input;
pub mod key;
pub mod matcher;
pub mod ordered;
pub mod plan;
pub mod render;
pub mod report;
pub mod serializer;
pub mod sort;
pub mod source;

pub use args::{GenerateArgs, SortArgs, VerifyArgs};
pub use assertor::StreamingAssertor;
pub use closer::{Closable, ClosableSet};
pub use config::{RecordComparator, TypeConfig};
pub use distance::{
    DoubleValueSimilarity, IntegerValueSimilarity, RecordDistance, TypeDistance, ValueSimilarity,
    NO_MATCH,
};
pub use equality::{Equaler, SchemaEqualer};
pub use error::VerifyError;
pub use format::{InputFormat, SequentialInputFormat, SequentialOutputFormat};
pub use generated::{generator_factory, GeneratorFactory, GeneratorReader};
pub use input::{InputIterator, RecordReader, VecRecordReader};
pub use key::KeyExtractor;
pub use matcher::{EqualityValueMatcher, FuzzyValueMatcher, NaiveFuzzyValueMatcher, Residue};
pub use ordered::assert_iterator_equals;
pub use plan::VerificationPlan;
pub use render::{Renderer, TupleRenderer};
pub use report::VerificationReport;
pub use serializer::{JsonLinesSerializer, RecordSerializer};
pub use sort::{ExternalSortMerger, RecordStream, SortMerger, SortedOutput, DEFAULT_MEMORY_BUDGET};
pub use source::RecordSource;
