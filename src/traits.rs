use crate::{error::Error, row::Row, value::Value};

/// Transforms a single row into zero or more output rows.
pub trait Mapper {
    fn apply(&self, row: Row) -> Result<Vec<Row>, Error>;
}

/// Consumes one contiguous group of rows that share a key tuple and
/// produces zero or more output rows for that group.
///
/// `group_key` pairs each grouping column's name with its value for the
/// group, so a reducer can carry the grouping columns through to its
/// output without needing to know them ahead of time.
pub trait Reducer {
    fn apply(&self, group_key: &[(String, Value)], rows: Vec<Row>) -> Result<Vec<Row>, Error>;
}

/// Combines a left-hand group and a right-hand group that share a key
/// tuple. Either side may be empty, representing a one-sided group; it is
/// the joiner's strategy (inner/left/right/outer) that decides what to do
/// with that case.
pub trait Joiner {
    fn apply(&self, keys: &[String], left: Vec<Row>, right: Vec<Row>) -> Result<Vec<Row>, Error>;
}
