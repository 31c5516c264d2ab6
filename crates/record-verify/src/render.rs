//! Human-readable rendering of records for diagnostics.

use record_core::Record;
use std::borrow::Borrow;
use std::fmt::{self, Write};

/// Number of records shown in a mismatch preview.
pub const PREVIEW_LIMIT: usize = 20;

/// Renders records as text.
pub trait Renderer: Send + Sync + fmt::Debug {
    /// Append the text form of `record` to `out`.
    fn append_as_string(&self, out: &mut dyn Write, record: &Record) -> fmt::Result;

    /// The text form of `record`.
    fn render(&self, record: &Record) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.append_as_string(&mut out, record);
        out
    }
}

/// Renders a record as its parenthesized field list, `(1, a, 2.5)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleRenderer;

impl Renderer for TupleRenderer {
    fn append_as_string(&self, out: &mut dyn Write, record: &Record) -> fmt::Result {
        write!(out, "{record}")
    }
}

/// Render at most `max` records separated by `separator`, followed by
/// `...` when more records remain.
pub fn stringify_with<I>(renderer: &dyn Renderer, records: I, max: usize, separator: &str) -> String
where
    I: IntoIterator,
    I::Item: Borrow<Record>,
{
    let mut out = String::new();
    let mut records = records.into_iter().peekable();
    let mut shown = 0;
    while shown < max {
        let Some(record) = records.next() else {
            break;
        };
        let _ = renderer.append_as_string(&mut out, record.borrow());
        shown += 1;
        if records.peek().is_some() {
            out.push_str(separator);
        }
    }
    if records.peek().is_some() {
        out.push_str("...");
    }
    out
}

/// Render a bounded, comma-separated preview of `records`.
pub fn stringify<I>(renderer: &dyn Renderer, records: I) -> String
where
    I: IntoIterator,
    I::Item: Borrow<Record>,
{
    stringify_with(renderer, records, PREVIEW_LIMIT, ", ")
}
