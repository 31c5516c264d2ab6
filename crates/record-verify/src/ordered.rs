//! Position-by-position comparison of two record streams.
//!
//! Unlike [`StreamingAssertor`](crate::StreamingAssertor), which groups by
//! key and ignores order within a group, this check requires both streams
//! to produce equal records in the same order.

use crate::config::TypeConfig;
use crate::error::VerifyError;
use crate::render::stringify;
use record_core::Record;
use tracing::debug;

/// Assert that `expected` and `actual` yield equal records in the same
/// order, using the configuration's equaler and renderer.
///
/// Returns the number of records compared. The first differing position
/// is reported as [`VerifyError::ValueMismatch`]. A longer expected stream
/// is reported as [`VerifyError::MoreElementsExpected`] and a longer actual
/// stream as [`VerifyError::LessElementsExpected`], each with a preview of
/// the surplus. Read errors from either stream are returned as they are.
pub fn assert_iterator_equals<E, A>(
    config: &TypeConfig,
    expected: E,
    actual: A,
) -> Result<u64, VerifyError>
where
    E: IntoIterator<Item = Result<Record, VerifyError>>,
    A: IntoIterator<Item = Result<Record, VerifyError>>,
{
    let mut expected = expected.into_iter();
    let mut actual = actual.into_iter();
    let mut position = 0u64;

    loop {
        match (expected.next().transpose()?, actual.next().transpose()?) {
            (Some(e), Some(a)) => {
                if !config.equaler().equal(&e, &a) {
                    return Err(VerifyError::ValueMismatch {
                        position,
                        expected: config.renderer().render(&e),
                        actual: config.renderer().render(&a),
                    });
                }
                position += 1;
            }
            (Some(e), None) => {
                let remaining = surplus(e, expected)?;
                return Err(VerifyError::MoreElementsExpected {
                    key: None,
                    remaining: stringify(config.renderer(), &remaining),
                });
            }
            (None, Some(a)) => {
                let remaining = surplus(a, actual)?;
                return Err(VerifyError::LessElementsExpected {
                    key: None,
                    remaining: stringify(config.renderer(), &remaining),
                });
            }
            (None, None) => break,
        }
    }

    debug!("Ordered comparison matched {position} records");
    Ok(position)
}

/// The first surplus record plus enough of the rest to render a preview.
fn surplus<I>(first: Record, rest: I) -> Result<Vec<Record>, VerifyError>
where
    I: Iterator<Item = Result<Record, VerifyError>>,
{
    let mut records = vec![first];
    for record in rest.take(crate::render::PREVIEW_LIMIT) {
        records.push(record?);
    }
    Ok(records)
}
