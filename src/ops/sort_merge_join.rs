use crate::{
    error::Error,
    ops::group_reduce::pull_group,
    row::Row,
    stream::RowStream,
    traits::Joiner,
    value::{Value, compare_key_tuples},
};
use std::{cmp::Ordering, iter::Peekable, sync::Arc};

type Group = (Vec<Value>, Vec<Row>);

/// Drives a [`Joiner`] across two streams pre-sorted by `keys`.
///
/// Both sides advance group by group (same grouping rule as
/// [`crate::ops::GroupReduce`]); at each step the current left and right
/// group keys are compared and the joiner is invoked with whichever side(s)
/// matched. The matched right group is the only buffering this operator
/// performs beyond holding one group per side at a time.
pub struct SortMergeJoin {
    left: Peekable<RowStream>,
    right: Peekable<RowStream>,
    keys: Vec<String>,
    joiner: Arc<dyn Joiner>,
    left_group: Option<Group>,
    right_group: Option<Group>,
    started: bool,
    pending: std::vec::IntoIter<Row>,
    done: bool,
}

impl SortMergeJoin {
    #[must_use]
    pub fn new(left: RowStream, right: RowStream, keys: Vec<String>, joiner: Arc<dyn Joiner>) -> Self {
        Self {
            left: left.peekable(),
            right: right.peekable(),
            keys,
            joiner,
            left_group: None,
            right_group: None,
            started: false,
            pending: Vec::new().into_iter(),
            done: false,
        }
    }

    fn ensure_started(&mut self) -> Result<(), Error> {
        if self.started {
            return Ok(());
        }
        self.left_group = pull_group(&mut self.left, &self.keys)?;
        self.right_group = pull_group(&mut self.right, &self.keys)?;
        self.started = true;
        Ok(())
    }

    fn step(&mut self) -> Result<Option<Vec<Row>>, Error> {
        self.ensure_started()?;

        match (self.left_group.take(), self.right_group.take()) {
            (None, None) => Ok(None),
            (Some((_, left_rows)), None) => {
                let out = self.joiner.apply(&self.keys, left_rows, Vec::new())?;
                self.left_group = pull_group(&mut self.left, &self.keys)?;
                Ok(Some(out))
            }
            (None, Some((_, right_rows))) => {
                let out = self.joiner.apply(&self.keys, Vec::new(), right_rows)?;
                self.right_group = pull_group(&mut self.right, &self.keys)?;
                Ok(Some(out))
            }
            (Some((left_key, left_rows)), Some((right_key, right_rows))) => {
                match compare_key_tuples(&self.keys, &left_key, &right_key)? {
                    Ordering::Less => {
                        let out = self.joiner.apply(&self.keys, left_rows, Vec::new())?;
                        self.left_group = pull_group(&mut self.left, &self.keys)?;
                        self.right_group = Some((right_key, right_rows));
                        Ok(Some(out))
                    }
                    Ordering::Greater => {
                        let out = self.joiner.apply(&self.keys, Vec::new(), right_rows)?;
                        self.right_group = pull_group(&mut self.right, &self.keys)?;
                        self.left_group = Some((left_key, left_rows));
                        Ok(Some(out))
                    }
                    Ordering::Equal => {
                        let out = self.joiner.apply(&self.keys, left_rows, right_rows)?;
                        self.left_group = pull_group(&mut self.left, &self.keys)?;
                        self.right_group = pull_group(&mut self.right, &self.keys)?;
                        Ok(Some(out))
                    }
                }
            }
        }
    }
}

impl Iterator for SortMergeJoin {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
            match self.step() {
                Ok(Some(rows)) => self.pending = rows.into_iter(),
                Ok(None) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
