//! Order-independent record collections used as expected and actual sets.
//!
//! A [`RecordSource`] has exactly one origin at a time: records added in
//! memory, a persisted location, or a generator. A source may also be
//! explicitly marked empty, which is distinct from never having been
//! initialized. Sorted views of persisted and generated sources go through
//! the source's [`SortMerger`]; the handles it returns are owned by the
//! source and released on [`RecordSource::close`] or drop.

use crate::assertor::{empty_stream, StreamingAssertor};
use crate::closer::ClosableSet;
use crate::config::TypeConfig;
use crate::error::VerifyError;
use crate::format::{resolve_inputs, InputFormat, SequentialInputFormat, SequentialOutputFormat};
use crate::generated::{generator_factory, GeneratorFactory};
use crate::input::{InputIterator, RecordReader};
use crate::render::stringify_with;
use crate::report::VerificationReport;
use crate::sort::{ExternalSortMerger, RecordStream, SortMerger, DEFAULT_MEMORY_BUDGET};
use record_core::{Record, Schema, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Records shown by [`RecordSource::preview`].
const SOURCE_PREVIEW_LIMIT: usize = 25;

enum Origin {
    Uninitialized,
    Empty,
    AdHoc(Arc<Vec<Record>>),
    Files {
        path: PathBuf,
        format: Arc<dyn InputFormat>,
    },
    Generated(GeneratorFactory),
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("Uninitialized"),
            Self::Empty => f.write_str("Empty"),
            Self::AdHoc(records) => write!(f, "AdHoc({} records)", records.len()),
            Self::Files { path, format } => write!(f, "Files({}, {format:?})", path.display()),
            Self::Generated(_) => f.write_str("Generated"),
        }
    }
}

/// A bag of records with a lazily computed key-ordered view.
pub struct RecordSource {
    origin: Origin,
    config: Option<TypeConfig>,
    closables: ClosableSet,
    memory_budget: usize,
    sort_merger: Arc<dyn SortMerger>,
}

impl Default for RecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSource")
            .field("origin", &self.origin)
            .field("schema", &self.config.as_ref().map(|c| c.schema().name.clone()))
            .field("memory_budget", &self.memory_budget)
            .finish()
    }
}

impl RecordSource {
    /// An uninitialized source without configuration.
    pub fn new() -> Self {
        Self {
            origin: Origin::Uninitialized,
            config: None,
            closables: ClosableSet::new(),
            memory_budget: DEFAULT_MEMORY_BUDGET,
            sort_merger: Arc::new(ExternalSortMerger::new()),
        }
    }

    /// An uninitialized source using `config`.
    pub fn with_config(config: TypeConfig) -> Self {
        let mut source = Self::new();
        source.config = Some(config);
        source
    }

    pub fn set_type_config(&mut self, config: TypeConfig) -> &mut Self {
        self.config = Some(config);
        self
    }

    pub fn type_config(&self) -> Option<&TypeConfig> {
        self.config.as_ref()
    }

    /// Memory budget handed to the sort collaborator, in bytes.
    pub fn set_memory_budget(&mut self, bytes: usize) -> &mut Self {
        self.memory_budget = bytes;
        self
    }

    pub fn memory_budget(&self) -> usize {
        self.memory_budget
    }

    pub fn set_sort_merger(&mut self, sort_merger: Arc<dyn SortMerger>) -> &mut Self {
        self.sort_merger = sort_merger;
        self
    }

    /// Append one record, switching to the ad-hoc origin.
    pub fn add(&mut self, record: Record) -> &mut Self {
        self.add_all(std::iter::once(record))
    }

    pub fn add_all<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = Record>,
    {
        if let Origin::AdHoc(existing) = &mut self.origin {
            Arc::make_mut(existing).extend(records);
        } else {
            self.origin = Origin::AdHoc(Arc::new(records.into_iter().collect()));
        }
        self
    }

    pub fn add_values(&mut self, values: Vec<Value>) -> &mut Self {
        self.add(Record::from_values(values))
    }

    /// Copy the records of `other` in key order, then release `other`.
    ///
    /// If `other` is explicitly empty this source becomes explicitly empty.
    pub fn add_source(&mut self, other: &mut RecordSource) -> Result<&mut Self, VerifyError> {
        if other.is_empty_marked() {
            self.set_empty();
            return Ok(self);
        }

        let copied = other
            .sorted_view()
            .and_then(|view| view.collect::<Result<Vec<_>, _>>());
        let closed = other.close();
        let records = copied?;
        closed?;

        if self.config.is_none() {
            self.config = other.config.clone();
        }
        self.add_all(records);
        Ok(self)
    }

    /// Read records from a fixture file, or from every file of a directory.
    pub fn load(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.load_with(Arc::new(SequentialInputFormat), path)
    }

    /// Read records from `path` with a custom input format.
    pub fn load_with(&mut self, format: Arc<dyn InputFormat>, path: impl AsRef<Path>) -> &mut Self {
        self.origin = Origin::Files {
            path: path.as_ref().to_path_buf(),
            format,
        };
        self
    }

    /// Produce records from a generator on every view.
    pub fn generate(&mut self, factory: GeneratorFactory) -> &mut Self {
        self.origin = Origin::Generated(factory);
        self
    }

    /// Generate `count` records of `schema` from `seed`.
    ///
    /// A source without configuration adopts the default configuration of
    /// `schema`.
    pub fn generate_from(&mut self, schema: Schema, seed: u64, count: u64) -> &mut Self {
        if self.config.is_none() {
            self.config = Some(TypeConfig::for_schema(schema.clone()));
        }
        self.generate(generator_factory(schema, seed, count))
    }

    /// Mark this source as deliberately empty.
    pub fn set_empty(&mut self) -> &mut Self {
        self.origin = Origin::Empty;
        self
    }

    /// Whether records were added, an origin was configured, or the source
    /// was marked empty.
    pub fn is_initialized(&self) -> bool {
        match &self.origin {
            Origin::Uninitialized => false,
            Origin::AdHoc(records) => !records.is_empty(),
            _ => true,
        }
    }

    /// Whether records were added in memory.
    pub fn is_adhoc(&self) -> bool {
        matches!(&self.origin, Origin::AdHoc(records) if !records.is_empty())
    }

    pub fn is_empty_marked(&self) -> bool {
        matches!(self.origin, Origin::Empty)
    }

    fn require_config(&self) -> Result<TypeConfig, VerifyError> {
        self.config.clone().ok_or_else(|| {
            VerifyError::Configuration(
                "No type configuration given. Set a default configuration on the plan or \
                 specify one when accessing the source"
                    .to_string(),
            )
        })
    }

    fn open_readers(&self, config: &TypeConfig) -> Result<Vec<Box<dyn RecordReader>>, VerifyError> {
        match &self.origin {
            Origin::Files { path, format } => {
                let files = resolve_inputs(path)?;
                debug!("Opening {} input files from {}", files.len(), path.display());
                files
                    .iter()
                    .map(|file| format.open(file, config))
                    .collect()
            }
            Origin::Generated(factory) => Ok(vec![factory()]),
            _ => Ok(Vec::new()),
        }
    }

    /// Records in key order under the source's own configuration.
    pub fn sorted_view(&mut self) -> Result<RecordStream, VerifyError> {
        if !self.is_initialized() || self.is_empty_marked() {
            return Ok(empty_stream());
        }
        let config = self.require_config()?;
        self.sorted_view_with(&config)
    }

    /// Records in key order under `config`.
    ///
    /// In-memory records are sorted in place. Persisted and generated
    /// records are sorted by the sort collaborator, whose handle is kept
    /// until the source is closed.
    pub fn sorted_view_with(&mut self, config: &TypeConfig) -> Result<RecordStream, VerifyError> {
        if let Origin::AdHoc(records) = &mut self.origin {
            Arc::make_mut(records).sort_by(|a, b| config.compare(a, b));
            return Ok(Box::new(SharedRecords::new(Arc::clone(records))));
        }

        let readers = self.open_readers(config)?;
        if readers.is_empty() {
            return Ok(empty_stream());
        }

        let input: RecordStream = Box::new(InputIterator::new(readers));
        let sorted = self.sort_merger.sort(
            input,
            Arc::clone(config.serializer()),
            config.comparator(),
            self.memory_budget,
        )?;
        self.closables.add(sorted.handle);
        Ok(sorted.records)
    }

    /// Records in origin order, without sorting.
    pub fn records(&self) -> Result<RecordStream, VerifyError> {
        match &self.origin {
            Origin::AdHoc(records) => Ok(Box::new(SharedRecords::new(Arc::clone(records)))),
            Origin::Files { .. } | Origin::Generated(_) => {
                let config = self.require_config()?;
                Ok(Box::new(InputIterator::new(self.open_readers(&config)?)))
            }
            Origin::Uninitialized | Origin::Empty => Ok(empty_stream()),
        }
    }

    /// Write the records in key order to a fixture file.
    ///
    /// Returns the number of records written.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<u64, VerifyError> {
        let config = self.require_config()?;
        let mut output = SequentialOutputFormat::create(path.as_ref(), &config)?;
        for record in self.sorted_view()? {
            output.write(&record?)?;
        }
        output.finish()
    }

    /// Key-ordered preview of the first records.
    pub fn preview(&mut self) -> Result<String, VerifyError> {
        let config = self.require_config()?;
        let mut pending = Vec::with_capacity(SOURCE_PREVIEW_LIMIT + 1);
        for record in self.sorted_view()?.take(SOURCE_PREVIEW_LIMIT + 1) {
            pending.push(record?);
        }
        Ok(stringify_with(
            config.renderer(),
            &pending,
            SOURCE_PREVIEW_LIMIT,
            "; ",
        ))
    }

    /// Assert that this source, the actual side, equals `expected`.
    ///
    /// The expected side's configuration drives the comparison. Both
    /// sources are closed afterwards; a close failure is reported only if
    /// the comparison itself succeeded.
    pub fn assert_equals(
        &mut self,
        expected: &mut RecordSource,
    ) -> Result<VerificationReport, VerifyError> {
        let outcome = self.compare_with(expected);
        let actual_closed = self.close();
        let expected_closed = expected.close();

        let report = outcome?;
        actual_closed?;
        expected_closed?;
        Ok(report)
    }

    fn compare_with(&mut self, expected: &mut RecordSource) -> Result<VerificationReport, VerifyError> {
        if !expected.is_initialized() {
            return Err(VerifyError::Configuration(
                "expected records are not initialized".to_string(),
            ));
        }
        let config = expected.require_config()?;

        let expected_view = if expected.is_empty_marked() {
            empty_stream()
        } else {
            expected.sorted_view_with(&config)?
        };
        let actual_view = if self.is_initialized() && !self.is_empty_marked() {
            self.sorted_view_with(&config)?
        } else {
            empty_stream()
        };

        StreamingAssertor::new(&config).assert_equals(expected_view, actual_view)
    }

    /// Whether this source equals `expected`, as decided by
    /// [`assert_equals`](Self::assert_equals).
    pub fn matches(&mut self, expected: &mut RecordSource) -> bool {
        match self.assert_equals(expected) {
            Ok(_) => true,
            Err(e) => {
                debug!("Sources differ: {e}");
                false
            }
        }
    }

    /// Release every handle opened by sorted views.
    pub fn close(&mut self) -> Result<(), VerifyError> {
        self.closables.close()
    }
}

/// Walks an ad-hoc record list without copying it up front.
struct SharedRecords {
    records: Arc<Vec<Record>>,
    next: usize,
}

impl SharedRecords {
    fn new(records: Arc<Vec<Record>>) -> Self {
        Self { records, next: 0 }
    }
}

impl Iterator for SharedRecords {
    type Item = Result<Record, VerifyError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.get(self.next)?.clone();
        self.next += 1;
        Some(Ok(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.records.len() - self.next;
        (left, Some(left))
    }
}

impl Drop for RecordSource {
    fn drop(&mut self) {
        if let Err(e) = self.closables.close() {
            warn!("Failed to release record source: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_core::{record, FieldType};
    use tempfile::TempDir;

    fn config() -> TypeConfig {
        TypeConfig::for_schema(Schema::of_types(&[FieldType::Int, FieldType::Text]))
    }

    fn source(records: Vec<Record>) -> RecordSource {
        let mut source = RecordSource::with_config(config());
        source.add_all(records);
        source
    }

    #[test]
    fn test_initialization_states() {
        let mut source = RecordSource::new();
        assert!(!source.is_initialized());
        assert!(!source.is_adhoc());

        source.set_empty();
        assert!(source.is_initialized());
        assert!(source.is_empty_marked());

        source.add(record![1, "a"]);
        assert!(source.is_adhoc());
        assert!(!source.is_empty_marked());

        source.load("fixtures/records.jsonl");
        assert!(source.is_initialized());
        assert!(!source.is_adhoc());
    }

    #[test]
    fn test_sorted_view_orders_by_key() {
        let mut source = source(vec![record![2, "b"], record![1, "a"], record![3, "c"]]);
        let records: Vec<Record> = source.sorted_view().unwrap().map(Result::unwrap).collect();
        assert_eq!(records, vec![record![1, "a"], record![2, "b"], record![3, "c"]]);
    }

    #[test]
    fn test_with_config_starts_uninitialized() {
        let source = RecordSource::with_config(config());
        assert!(!source.is_initialized());
        assert_eq!(source.type_config().unwrap().schema().len(), 2);
        assert_eq!(source.memory_budget(), DEFAULT_MEMORY_BUDGET);
    }

    #[test]
    fn test_adhoc_view_is_a_snapshot() {
        let mut source = source(vec![record![2, "b"], record![1, "a"]]);
        let view = source.sorted_view().unwrap();
        assert_eq!(view.size_hint(), (2, Some(2)));

        source.add(record![0, "z"]);
        let seen: Vec<Record> = view.map(Result::unwrap).collect();
        assert_eq!(seen, vec![record![1, "a"], record![2, "b"]]);

        let records: Vec<Record> = source.records().unwrap().map(Result::unwrap).collect();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_sorted_view_without_config_fails() {
        let mut source = RecordSource::new();
        source.add(record![1]);
        let err = source.sorted_view().err().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_preview_is_bounded() {
        let mut source = source((0..30).map(|i| record![i, "x"]).collect());
        let preview = source.preview().unwrap();
        assert!(preview.starts_with("(0, x); (1, x); "));
        assert!(preview.ends_with("(24, x); ..."));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fixture.jsonl");

        let mut original = source(vec![record![2, "b"], record![1, "a"]]);
        assert_eq!(original.save_to_file(&path).unwrap(), 2);

        let mut loaded = RecordSource::with_config(config());
        loaded.load(&path);
        loaded.assert_equals(&mut original).unwrap();
    }

    #[test]
    fn test_add_source_copies_records() {
        let mut other = source(vec![record![1, "a"]]);
        let mut target = RecordSource::new();
        target.add_source(&mut other).unwrap();
        assert!(target.is_adhoc());
        assert!(target.type_config().is_some());

        let mut empty = RecordSource::new();
        empty.set_empty();
        target.add_source(&mut empty).unwrap();
        assert!(target.is_empty_marked());
    }

    #[test]
    fn test_uninitialized_expected_is_configuration_error() {
        let mut expected = RecordSource::with_config(config());
        let mut actual = RecordSource::with_config(config());
        let err = actual.assert_equals(&mut expected).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_expected_matches_uninitialized_actual() {
        let mut expected = RecordSource::with_config(config());
        expected.set_empty();
        let mut actual = RecordSource::new();
        assert!(actual.matches(&mut expected));
    }
}
