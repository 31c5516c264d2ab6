//! Record serialization for fixtures and spill files.

use record_core::Record;
use std::fmt;
use std::io::{self, BufRead, Write};

/// Writes and reads records one at a time.
pub trait RecordSerializer: Send + Sync + fmt::Debug {
    fn serialize(&self, record: &Record, out: &mut dyn Write) -> io::Result<()>;

    /// Read the next record, `None` at end of input.
    fn deserialize(&self, input: &mut dyn BufRead) -> io::Result<Option<Record>>;

    /// Serialized size of a record in bytes.
    fn serialized_size(&self, record: &Record) -> io::Result<usize> {
        let mut buffer = Vec::new();
        self.serialize(record, &mut buffer)?;
        Ok(buffer.len())
    }
}

/// One JSON document per line, each field tagged with its value type.
///
/// ```text
/// [{"type":"int","value":1},{"type":"text","value":"a"}]
/// ```
///
/// Blank lines are skipped when reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesSerializer;

impl RecordSerializer for JsonLinesSerializer {
    fn serialize(&self, record: &Record, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")
    }

    fn deserialize(&self, input: &mut dyn BufRead) -> io::Result<Option<Record>> {
        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record = serde_json::from_str(trimmed)?;
            return Ok(Some(record));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_core::{record, Value};
    use std::io::Cursor;

    #[test]
    fn test_lines_are_read_back_in_order() {
        let serializer = JsonLinesSerializer;
        let mut buffer = Vec::new();
        serializer.serialize(&record![1, "a"], &mut buffer).unwrap();
        serializer.serialize(&record![2, "b"], &mut buffer).unwrap();

        let mut input = Cursor::new(buffer);
        assert_eq!(serializer.deserialize(&mut input).unwrap(), Some(record![1, "a"]));
        assert_eq!(serializer.deserialize(&mut input).unwrap(), Some(record![2, "b"]));
        assert_eq!(serializer.deserialize(&mut input).unwrap(), None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "\n[{\"type\":\"null\"}]\n\n";
        let mut input = Cursor::new(text.as_bytes());
        let record = JsonLinesSerializer.deserialize(&mut input).unwrap().unwrap();
        assert_eq!(record.field(0), Some(&Value::Null));
        assert_eq!(JsonLinesSerializer.deserialize(&mut input).unwrap(), None);
    }

    #[test]
    fn test_malformed_line_is_invalid_data() {
        let mut input = Cursor::new(b"not json\n".to_vec());
        let err = JsonLinesSerializer.deserialize(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_serialized_size() {
        let size = JsonLinesSerializer.serialized_size(&record![1]).unwrap();
        assert_eq!(size, "[{\"type\":\"int\",\"value\":1}]\n".len());
    }
}
