use crate::{error::Error, row::Row, stream::RowStream, traits::Mapper};
use std::sync::Arc;

/// Applies a [`Mapper`] to every row pulled from upstream, forwarding every
/// row the mapper emits before pulling the next upstream row. Streaming,
/// one-to-many; no buffering beyond the current row's output.
pub struct Map {
    upstream: RowStream,
    mapper: Arc<dyn Mapper>,
    pending: std::vec::IntoIter<Row>,
}

impl Map {
    #[must_use]
    pub fn new(upstream: RowStream, mapper: Arc<dyn Mapper>) -> Self {
        Self {
            upstream,
            mapper,
            pending: Vec::new().into_iter(),
        }
    }
}

impl Iterator for Map {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            let row = match self.upstream.next()? {
                Ok(row) => row,
                Err(err) => return Some(Err(err)),
            };
            match self.mapper.apply(row) {
                Ok(rows) => self.pending = rows.into_iter(),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
