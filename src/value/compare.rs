use crate::{
    error::Error,
    value::{Value, tag},
};
use std::cmp::Ordering;

/// Total order across all value kinds. Same-kind values compare naturally;
/// mismatched kinds fall back to tag rank so the comparator stays total
/// (used only where a non-failing total order is required, e.g. the
/// in-memory sort of external-sort run buffers after the run's own
/// key-kind check has already passed).
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    match strict_order_cmp(left, right) {
        Some(ordering) => ordering,
        None => tag::canonical_tag(left)
            .label()
            .cmp(tag::canonical_tag(right).label()),
    }
}

/// Strict comparator for identical value kinds.
///
/// Returns `None` for mismatched kinds, and for `Geo` (coordinates are only
/// ever joined or compared for equality, never ordered).
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.partial_cmp(b),
        _ => None,
    }
}

/// Compares two key tuples column by column, failing with
/// [`Error::KeyTypeMismatch`] at the first position where the two values
/// have incompatible kinds.
pub fn compare_key_tuples(
    columns: &[String],
    left: &[Value],
    right: &[Value],
) -> Result<Ordering, Error> {
    for ((column, l), r) in columns.iter().zip(left).zip(right) {
        match strict_order_cmp(l, r) {
            Some(Ordering::Equal) => {}
            Some(ordering) => return Ok(ordering),
            None => {
                return Err(Error::KeyTypeMismatch {
                    column: column.clone(),
                    left: tag::canonical_tag(l).label(),
                    right: tag::canonical_tag(r).label(),
                });
            }
        }
    }
    Ok(Ordering::Equal)
}
