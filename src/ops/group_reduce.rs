use crate::{error::Error, row::Row, stream::RowStream, traits::Reducer, value::Value};
use std::{iter::Peekable, sync::Arc};

/// Pulls one maximal contiguous run of rows sharing `keys` off `upstream`.
///
/// Shared by [`GroupReduce`] and the sort-merge join, both of which consume
/// pre-sorted streams group by group rather than row by row.
pub(crate) fn pull_group(
    upstream: &mut Peekable<RowStream>,
    keys: &[String],
) -> Result<Option<(Vec<Value>, Vec<Row>)>, Error> {
    let first = match upstream.next() {
        Some(row) => row?,
        None => return Ok(None),
    };
    let key = first.key_tuple(keys)?;
    let mut rows = vec![first];

    loop {
        let same_group = match upstream.peek() {
            Some(Ok(row)) => row.key_tuple(keys)? == key,
            Some(Err(_)) => return Err(upstream.next().expect("peeked Some").unwrap_err()),
            None => false,
        };
        if !same_group {
            break;
        }
        rows.push(upstream.next().expect("peeked Some").expect("peeked Ok"));
    }

    Ok(Some((key, rows)))
}

/// Partitions a pre-sorted stream into groups by `keys` and drives a
/// [`Reducer`] over each group in turn, forwarding every row it emits
/// before pulling the next group.
pub struct GroupReduce {
    upstream: Peekable<RowStream>,
    keys: Vec<String>,
    reducer: Arc<dyn Reducer>,
    pending: std::vec::IntoIter<Row>,
    done: bool,
}

impl GroupReduce {
    #[must_use]
    pub fn new(upstream: RowStream, keys: Vec<String>, reducer: Arc<dyn Reducer>) -> Self {
        Self {
            upstream: upstream.peekable(),
            keys,
            reducer,
            pending: Vec::new().into_iter(),
            done: false,
        }
    }
}

impl Iterator for GroupReduce {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
            match pull_group(&mut self.upstream, &self.keys) {
                Ok(Some((key, rows))) => {
                    let named_key: Vec<(String, Value)> =
                        self.keys.iter().cloned().zip(key).collect();
                    match self.reducer.apply(&named_key, rows) {
                        Ok(out) => self.pending = out.into_iter(),
                        Err(err) => {
                            self.done = true;
                            return Some(Err(err));
                        }
                    }
                }
                Ok(None) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Reducer;

    struct CountRows;
    impl Reducer for CountRows {
        fn apply(&self, group_key: &[(String, Value)], rows: Vec<Row>) -> Result<Vec<Row>, Error> {
            let mut row = Row::new();
            for (name, value) in group_key {
                row.set(name.clone(), value.clone());
            }
            row.set("count", Value::Int(rows.len() as i64));
            Ok(vec![row])
        }
    }

    fn row_with(key: i64) -> Result<Row, Error> {
        let mut row = Row::new();
        row.set("k", Value::Int(key));
        Ok(row)
    }

    #[test]
    fn groups_contiguous_equal_keys() {
        let upstream: RowStream = Box::new(
            vec![row_with(1), row_with(1), row_with(2), row_with(2), row_with(2)].into_iter(),
        );
        let reduced: Vec<Row> = GroupReduce::new(upstream, vec!["k".to_string()], Arc::new(CountRows))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced[0].get("count"), Some(&Value::Int(2)));
        assert_eq!(reduced[1].get("count"), Some(&Value::Int(3)));
    }

    #[test]
    fn empty_upstream_yields_empty_output() {
        let upstream: RowStream = Box::new(std::iter::empty());
        let reduced: Vec<Row> = GroupReduce::new(upstream, vec!["k".to_string()], Arc::new(CountRows))
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(reduced.is_empty());
    }
}
