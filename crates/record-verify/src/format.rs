//! Sequential fixture files.
//!
//! A fixture file holds one serialized record after another in the
//! configuration's serializer format. A directory of fixture files is read
//! as the concatenation of its files in name order.

use crate::config::TypeConfig;
use crate::error::VerifyError;
use crate::input::RecordReader;
use crate::serializer::RecordSerializer;
use record_core::Record;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Opens readers over persisted records.
pub trait InputFormat: Send + Sync + fmt::Debug {
    fn open(&self, path: &Path, config: &TypeConfig) -> Result<Box<dyn RecordReader>, VerifyError>;
}

/// Reads files written by [`SequentialOutputFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialInputFormat;

impl InputFormat for SequentialInputFormat {
    fn open(&self, path: &Path, config: &TypeConfig) -> Result<Box<dyn RecordReader>, VerifyError> {
        let file = File::open(path).map_err(|e| VerifyError::io(path.display().to_string(), e))?;
        Ok(Box::new(FileRecordReader {
            path: path.to_path_buf(),
            reader: Some(BufReader::new(file)),
            serializer: Arc::clone(config.serializer()),
            ended: false,
        }))
    }
}

/// Reader over one sequential fixture file.
pub struct FileRecordReader {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    serializer: Arc<dyn RecordSerializer>,
    ended: bool,
}

impl RecordReader for FileRecordReader {
    fn reached_end(&self) -> bool {
        self.ended
    }

    fn next_record(&mut self, target: &mut Record) -> io::Result<bool> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };
        match self.serializer.deserialize(reader)? {
            Some(record) => {
                *target = record;
                Ok(true)
            }
            None => {
                self.ended = true;
                Ok(false)
            }
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        self.ended = true;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes records to a sequential fixture file.
pub struct SequentialOutputFormat {
    path: PathBuf,
    writer: BufWriter<File>,
    serializer: Arc<dyn RecordSerializer>,
    written: u64,
}

impl SequentialOutputFormat {
    /// Create (or truncate) the file at `path`, creating parent directories.
    pub fn create(path: &Path, config: &TypeConfig) -> Result<Self, VerifyError> {
        let desc = || path.display().to_string();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| VerifyError::io(desc(), e))?;
        }
        let file = File::create(path).map_err(|e| VerifyError::io(desc(), e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            serializer: Arc::clone(config.serializer()),
            written: 0,
        })
    }

    pub fn write(&mut self, record: &Record) -> Result<(), VerifyError> {
        self.serializer
            .serialize(record, &mut self.writer)
            .map_err(|e| VerifyError::io(self.path.display().to_string(), e))?;
        self.written += 1;
        Ok(())
    }

    /// Flush and close the file, returning the number of records written.
    pub fn finish(mut self) -> Result<u64, VerifyError> {
        self.writer
            .flush()
            .map_err(|e| VerifyError::io(self.path.display().to_string(), e))?;
        debug!("Wrote {} records to {}", self.written, self.path.display());
        Ok(self.written)
    }
}

/// Resolve a load path to the files it designates.
///
/// A directory yields its immediate files sorted by name; anything else is
/// a single file.
pub fn resolve_inputs(path: &Path) -> Result<Vec<PathBuf>, VerifyError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let desc = || path.display().to_string();
    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| VerifyError::io(desc(), e))? {
        let entry = entry.map_err(|e| VerifyError::io(desc(), e))?;
        let entry_path = entry.path();
        if entry_path.is_file() {
            files.push(entry_path);
        }
    }

    // Sort for consistent ordering
    files.sort();

    debug!("Listed {} files in directory: {}", files.len(), path.display());
    Ok(files)
}
