//! Key-ordering of record streams under a memory budget.
//!
//! [`ExternalSortMerger`] buffers records until their serialized size
//! exceeds the budget, spills each full buffer as a sorted run into a
//! temporary directory, and merges the runs. Inputs that fit in the budget
//! are sorted in memory without touching the disk.

use crate::closer::Closable;
use crate::config::RecordComparator;
use crate::error::VerifyError;
use crate::serializer::RecordSerializer;
use record_core::Record;
use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info};

/// Default memory budget for sorting one source.
pub const DEFAULT_MEMORY_BUDGET: usize = 10 * 1024 * 1024;

/// Stream of records or read failures.
pub type RecordStream = Box<dyn Iterator<Item = Result<Record, VerifyError>> + Send>;

/// A key-ordered stream and the handle owning its temporary storage.
pub struct SortedOutput {
    pub records: RecordStream,
    pub handle: Box<dyn Closable>,
}

/// Turns an unordered stream into a key-ordered one.
///
/// Output order matches `comparator` and every input record appears exactly
/// once in the output.
pub trait SortMerger: Send + Sync + fmt::Debug {
    fn sort(
        &self,
        input: RecordStream,
        serializer: Arc<dyn RecordSerializer>,
        comparator: RecordComparator,
        memory_budget: usize,
    ) -> Result<SortedOutput, VerifyError>;
}

/// Spilling merge sort.
#[derive(Debug, Clone, Default)]
pub struct ExternalSortMerger {
    temp_root: Option<PathBuf>,
}

impl ExternalSortMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place spill directories under `dir` instead of the system temp dir.
    pub fn with_temp_root(dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: Some(dir.into()),
        }
    }

    fn create_spill_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("recordcheck-sort-");
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

impl SortMerger for ExternalSortMerger {
    fn sort(
        &self,
        input: RecordStream,
        serializer: Arc<dyn RecordSerializer>,
        comparator: RecordComparator,
        memory_budget: usize,
    ) -> Result<SortedOutput, VerifyError> {
        let mut spill = SpillHandle::default();
        let mut runs: Vec<PathBuf> = Vec::new();
        let mut buffer: Vec<Record> = Vec::new();
        let mut buffered_bytes = 0usize;
        let mut total = 0u64;

        for record in input {
            let record = record?;
            buffered_bytes += serializer
                .serialized_size(&record)
                .map_err(|e| VerifyError::io("sort buffer", e))?;
            buffer.push(record);
            total += 1;

            if buffered_bytes > memory_budget {
                if spill.dir.is_none() {
                    let dir = self
                        .create_spill_dir()
                        .map_err(|e| VerifyError::io("sort spill directory", e))?;
                    debug!("Spilling sort runs to {}", dir.path().display());
                    spill.dir = Some(dir);
                }
                let path = spill.run_path(runs.len())?;
                write_run(&path, &mut buffer, serializer.as_ref(), &comparator)?;
                runs.push(path);
                buffered_bytes = 0;
            }
        }

        if runs.is_empty() {
            buffer.sort_by(|a, b| comparator(a, b));
            debug!("Sorted {total} records in memory");
            return Ok(SortedOutput {
                records: Box::new(buffer.into_iter().map(Ok)),
                handle: Box::new(spill),
            });
        }

        if !buffer.is_empty() {
            let path = spill.run_path(runs.len())?;
            write_run(&path, &mut buffer, serializer.as_ref(), &comparator)?;
            runs.push(path);
        }
        info!("Merging {} sorted runs of {total} records", runs.len());

        let merge = MergeIterator::open(runs, serializer, comparator)?;
        Ok(SortedOutput {
            records: Box::new(merge),
            handle: Box::new(spill),
        })
    }
}

fn write_run(
    path: &PathBuf,
    buffer: &mut Vec<Record>,
    serializer: &dyn RecordSerializer,
    comparator: &RecordComparator,
) -> Result<(), VerifyError> {
    buffer.sort_by(|a, b| comparator(a, b));
    let desc = || path.display().to_string();
    let file = File::create(path).map_err(|e| VerifyError::io(desc(), e))?;
    let mut writer = BufWriter::new(file);
    for record in buffer.drain(..) {
        serializer
            .serialize(&record, &mut writer)
            .map_err(|e| VerifyError::io(desc(), e))?;
    }
    writer.flush().map_err(|e| VerifyError::io(desc(), e))?;
    debug!("Wrote sort run {}", path.display());
    Ok(())
}

/// Owner of the spill directory of one sort.
#[derive(Default)]
pub struct SpillHandle {
    dir: Option<TempDir>,
}

impl SpillHandle {
    fn run_path(&self, run: usize) -> Result<PathBuf, VerifyError> {
        self.dir
            .as_ref()
            .map(|dir| dir.path().join(format!("run-{run:05}.jsonl")))
            .ok_or_else(|| VerifyError::Configuration("sort run without spill directory".into()))
    }
}

impl Closable for SpillHandle {
    fn close(&mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        match &self.dir {
            Some(dir) => format!("sort spill directory {}", dir.path().display()),
            None => "in-memory sort".to_string(),
        }
    }
}

struct RunReader {
    path: PathBuf,
    reader: BufReader<File>,
}

/// K-way merge of sorted runs.
///
/// Ties go to the earlier run, which keeps the overall sort stable.
struct MergeIterator {
    runs: Vec<RunReader>,
    heads: Vec<Option<Record>>,
    serializer: Arc<dyn RecordSerializer>,
    comparator: RecordComparator,
    failed: bool,
}

impl MergeIterator {
    fn open(
        paths: Vec<PathBuf>,
        serializer: Arc<dyn RecordSerializer>,
        comparator: RecordComparator,
    ) -> Result<Self, VerifyError> {
        let mut runs = Vec::with_capacity(paths.len());
        for path in paths {
            let file = File::open(&path).map_err(|e| VerifyError::io(path.display().to_string(), e))?;
            runs.push(RunReader {
                path,
                reader: BufReader::new(file),
            });
        }

        let mut merge = Self {
            heads: Vec::with_capacity(runs.len()),
            runs,
            serializer,
            comparator,
            failed: false,
        };
        for run in 0..merge.runs.len() {
            let head = merge.read_next(run)?;
            merge.heads.push(head);
        }
        Ok(merge)
    }

    fn read_next(&mut self, run: usize) -> Result<Option<Record>, VerifyError> {
        let RunReader { path, reader } = &mut self.runs[run];
        self.serializer
            .deserialize(reader)
            .map_err(|e| VerifyError::io(path.display().to_string(), e))
    }
}

impl Iterator for MergeIterator {
    type Item = Result<Record, VerifyError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut smallest: Option<usize> = None;
        for (run, head) in self.heads.iter().enumerate() {
            let Some(record) = head else {
                continue;
            };
            let better = match smallest.and_then(|s| self.heads[s].as_ref()) {
                Some(current) => (self.comparator)(record, current) == Ordering::Less,
                None => true,
            };
            if better {
                smallest = Some(run);
            }
        }

        let run = smallest?;
        let record = self.heads[run].take();
        match self.read_next(run) {
            Ok(next) => self.heads[run] = next,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        }
        record.map(Ok)
    }
}
