//! Pull-based record reading.
//!
//! Format readers fill a caller-provided record in place. [`InputIterator`]
//! chains any number of readers and hands out owned records, so a returned
//! record is never overwritten by the next pull.

use crate::error::VerifyError;
use record_core::Record;
use std::collections::VecDeque;
use std::io;
use std::mem;
use tracing::{debug, warn};

/// Reader side of a record producer.
pub trait RecordReader: Send {
    /// Whether the reader has no more records.
    fn reached_end(&self) -> bool;

    /// Fill `target` with the next record. Returns `false` when no record
    /// was produced.
    fn next_record(&mut self, target: &mut Record) -> io::Result<bool>;

    /// Release the underlying resource. Calling it again must be a no-op.
    fn close(&mut self) -> io::Result<()>;

    /// Description used in error messages, usually the file path.
    fn describe(&self) -> String;
}

/// Reader over records already in memory.
pub struct VecRecordReader {
    records: std::vec::IntoIter<Record>,
    description: String,
}

impl VecRecordReader {
    pub fn new(records: Vec<Record>, description: impl Into<String>) -> Self {
        Self {
            records: records.into_iter(),
            description: description.into(),
        }
    }
}

impl RecordReader for VecRecordReader {
    fn reached_end(&self) -> bool {
        self.records.as_slice().is_empty()
    }

    fn next_record(&mut self, target: &mut Record) -> io::Result<bool> {
        match self.records.next() {
            Some(record) => {
                *target = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Concatenation of homogeneous readers, yielding owned records.
///
/// The next reader is started only once the current one reports
/// `reached_end()`. Exhausted readers are closed immediately. After an
/// error the iterator is fused.
pub struct InputIterator {
    pending: VecDeque<Box<dyn RecordReader>>,
    current: Option<Box<dyn RecordReader>>,
    buffer: Record,
    failed: bool,
}

impl InputIterator {
    pub fn new(readers: Vec<Box<dyn RecordReader>>) -> Self {
        Self {
            pending: readers.into(),
            current: None,
            buffer: Record::new(),
            failed: false,
        }
    }

    fn fail(&mut self, error: VerifyError) -> Option<Result<Record, VerifyError>> {
        self.failed = true;
        self.release_all();
        Some(Err(error))
    }

    fn release_all(&mut self) {
        for mut reader in self.current.take().into_iter().chain(self.pending.drain(..)) {
            if let Err(e) = reader.close() {
                warn!("Failed to close {}: {e}", reader.describe());
            }
        }
    }
}

impl Iterator for InputIterator {
    type Item = Result<Record, VerifyError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if self.current.is_none() {
                let next = self.pending.pop_front()?;
                debug!("Reading records from {}", next.describe());
                self.current = Some(next);
            }
            let Some(reader) = self.current.as_mut() else {
                continue;
            };

            if !reader.reached_end() {
                match reader.next_record(&mut self.buffer) {
                    Ok(true) => return Some(Ok(mem::take(&mut self.buffer))),
                    Ok(false) => {}
                    Err(e) => {
                        let error = VerifyError::io(reader.describe(), e);
                        return self.fail(error);
                    }
                }
            }

            // Exhausted: a reader that produced nothing is treated as ended
            if let Some(mut reader) = self.current.take() {
                if let Err(e) = reader.close() {
                    let error = VerifyError::io(reader.describe(), e);
                    return self.fail(error);
                }
            }
        }
    }
}

impl Drop for InputIterator {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_core::record;

    struct FailingReader {
        produced: bool,
    }

    impl RecordReader for FailingReader {
        fn reached_end(&self) -> bool {
            false
        }

        fn next_record(&mut self, target: &mut Record) -> io::Result<bool> {
            if self.produced {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt"));
            }
            self.produced = true;
            *target = record![1];
            Ok(true)
        }

        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn describe(&self) -> String {
            "broken.jsonl".to_string()
        }
    }

    #[test]
    fn test_concatenates_readers_in_order() {
        let readers: Vec<Box<dyn RecordReader>> = vec![
            Box::new(VecRecordReader::new(vec![record![1], record![2]], "a")),
            Box::new(VecRecordReader::new(vec![], "empty")),
            Box::new(VecRecordReader::new(vec![record![3]], "b")),
        ];
        let records: Vec<Record> = InputIterator::new(readers)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records, vec![record![1], record![2], record![3]]);
    }

    #[test]
    fn test_records_are_owned() {
        let readers: Vec<Box<dyn RecordReader>> = vec![Box::new(VecRecordReader::new(
            vec![record![1], record![2]],
            "a",
        ))];
        let mut iter = InputIterator::new(readers);
        let first = iter.next().unwrap().unwrap();
        let second = iter.next().unwrap().unwrap();
        assert_eq!(first, record![1]);
        assert_eq!(second, record![2]);
    }

    #[test]
    fn test_io_error_carries_description_and_fuses() {
        let readers: Vec<Box<dyn RecordReader>> = vec![Box::new(FailingReader { produced: false })];
        let mut iter = InputIterator::new(readers);
        assert!(iter.next().unwrap().is_ok());
        match iter.next() {
            Some(Err(VerifyError::Io { source_desc, .. })) => {
                assert_eq!(source_desc, "broken.jsonl")
            }
            other => panic!("Expected Io error, got {other:?}"),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_no_readers_is_empty() {
        assert_eq!(InputIterator::new(Vec::new()).count(), 0);
    }
}
