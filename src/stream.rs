use crate::{error::Error, row::Row};

/// A finite, single-pass, lazily-pulled sequence of rows.
///
/// Streams are not restartable: once exhausted, or dropped, the resources
/// backing them (open files, join group buffers, external-sort spill
/// files) are released and cannot be replayed. Restartability, where it's
/// needed, lives one level up in the [`crate::bindings::Binding`] a source
/// stage is opened from.
pub type RowStream = Box<dyn Iterator<Item = Result<Row, Error>>>;
