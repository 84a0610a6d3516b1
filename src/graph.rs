use crate::{
    bindings::{Binding, Bindings},
    error::Error,
    ops::{ExternalSort, GroupReduce, LineParser, Map, ReadFromFile, ReadFromIterator, SortMergeJoin, default_parser},
    row::Row,
    stream::RowStream,
    traits::{Joiner, Mapper, Reducer},
};
use std::sync::Arc;

/// Runs above this many buffered rows force a spill to disk during `Sort`.
///
/// Chosen as a conservative default for the pipelines in this crate, all of
/// which run against modestly sized fixtures; callers with larger data
/// should prefer constructing [`ExternalSort`] directly with a tuned
/// capacity rather than go through [`Graph::sort`].
const DEFAULT_SORT_RUN_CAPACITY: usize = 100_000;

/// Where a graph's stream of rows originates.
#[derive(Clone)]
pub enum Source {
    /// Reads from `bindings[name]`, a thunk producing a fresh row stream.
    Iter(String),
    /// Reads from `bindings[name]`, a thunk producing a file path, parsed
    /// one row per non-empty line by `parser`.
    File(String, LineParser),
}

impl Source {
    fn open(&self, bindings: &Bindings) -> Result<RowStream, Error> {
        match self {
            Self::Iter(name) => {
                let binding = bindings.get(name).ok_or_else(|| Error::MissingBinding { name: name.clone() })?;
                match binding {
                    Binding::Iter(thunk) => Ok(Box::new(ReadFromIterator::new(thunk()))),
                    Binding::Path(_) => Err(Error::MissingBinding { name: name.clone() }),
                }
            }
            Self::File(name, parser) => {
                let binding = bindings.get(name).ok_or_else(|| Error::MissingBinding { name: name.clone() })?;
                match binding {
                    Binding::Path(thunk) => Ok(Box::new(ReadFromFile::open(thunk(), *parser)?)),
                    Binding::Iter(_) => Err(Error::MissingBinding { name: name.clone() }),
                }
            }
        }
    }
}

/// One node of a graph, appended by the builder methods on [`Graph`].
#[derive(Clone)]
pub enum Stage {
    Map(Arc<dyn Mapper>),
    Reduce(Arc<dyn Reducer>, Vec<String>),
    Sort(Vec<String>),
    Join(Arc<dyn Joiner>, Vec<String>, Arc<Graph>),
}

/// A composed, reusable pipeline: a source plus an ordered list of stages.
///
/// A graph is a value. Building one never touches its bindings; `execute`
/// may be called any number of times, each producing an independent stream,
/// provided the supplied bindings are themselves restartable.
#[derive(Clone)]
pub struct Graph {
    source: Source,
    stages: Vec<Stage>,
}

impl Graph {
    /// Starts a graph reading rows straight from an iterator binding.
    #[must_use]
    pub fn from_iter(name: impl Into<String>) -> Self {
        Self {
            source: Source::Iter(name.into()),
            stages: Vec::new(),
        }
    }

    /// Starts a graph reading rows from a file binding, one row per
    /// non-empty line via `parser` (defaults to [`default_parser`] when
    /// `None`).
    #[must_use]
    pub fn from_file(name: impl Into<String>, parser: Option<LineParser>) -> Self {
        Self {
            source: Source::File(name.into(), parser.unwrap_or(default_parser)),
            stages: Vec::new(),
        }
    }

    #[must_use]
    pub fn map(mut self, mapper: impl Mapper + 'static) -> Self {
        tracing::debug!("appending map stage");
        self.stages.push(Stage::Map(Arc::new(mapper)));
        self
    }

    #[must_use]
    pub fn reduce(mut self, reducer: impl Reducer + 'static, keys: Vec<String>) -> Self {
        tracing::debug!(?keys, "appending reduce stage");
        self.stages.push(Stage::Reduce(Arc::new(reducer), keys));
        self
    }

    #[must_use]
    pub fn sort(mut self, keys: Vec<String>) -> Self {
        tracing::debug!(?keys, "appending sort stage");
        self.stages.push(Stage::Sort(keys));
        self
    }

    #[must_use]
    pub fn join(mut self, joiner: impl Joiner + 'static, other: Self, keys: Vec<String>) -> Self {
        tracing::debug!(?keys, "appending join stage");
        self.stages.push(Stage::Join(Arc::new(joiner), keys, Arc::new(other)));
        self
    }

    /// Builds the stream for this graph against `bindings`. Every stage's
    /// operator is instantiated fresh, so the same graph may be executed
    /// repeatedly.
    pub fn execute(&self, bindings: &Bindings) -> Result<RowStream, Error> {
        tracing::info!(stages = self.stages.len(), "executing graph");
        let mut stream = self.source.open(bindings)?;

        for stage in &self.stages {
            stream = match stage {
                Stage::Map(mapper) => Box::new(Map::new(stream, Arc::clone(mapper))),
                Stage::Reduce(reducer, keys) => Box::new(GroupReduce::new(stream, keys.clone(), Arc::clone(reducer))),
                Stage::Sort(keys) => Box::new(ExternalSort::new(stream, keys.clone(), DEFAULT_SORT_RUN_CAPACITY)),
                Stage::Join(joiner, keys, right_graph) => {
                    tracing::debug!("executing joined right-hand graph");
                    let right = right_graph.execute(bindings)?;
                    Box::new(SortMergeJoin::new(stream, right, keys.clone(), Arc::clone(joiner)))
                }
            };
        }

        tracing::info!("graph execution complete");
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{transforms::reducer::Count, value::Value};

    fn row(n: i64) -> Result<Row, Error> {
        let mut row = Row::new();
        row.set("n", Value::Int(n));
        Ok(row)
    }

    fn rows_binding(values: Vec<i64>) -> Binding {
        Binding::from_iter_fn(move || -> RowStream { Box::new(values.clone().into_iter().map(row)) })
    }

    #[test]
    fn pass_through_with_no_stages_yields_the_source_unchanged() {
        let mut bindings = Bindings::new();
        bindings.insert("src".to_string(), rows_binding(vec![1, 2, 3]));

        let graph = Graph::from_iter("src");
        let rows: Vec<i64> = graph
            .execute(&bindings)
            .unwrap()
            .map(|r| r.unwrap().get("n").unwrap().as_int().unwrap())
            .collect();
        assert_eq!(rows, vec![1, 2, 3]);
    }

    #[test]
    fn executing_a_graph_twice_yields_equal_output() {
        let mut bindings = Bindings::new();
        bindings.insert("src".to_string(), rows_binding(vec![3, 1, 2]));

        let graph = Graph::from_iter("src").sort(vec!["n".to_string()]);

        let first: Vec<i64> = graph
            .execute(&bindings)
            .unwrap()
            .map(|r| r.unwrap().get("n").unwrap().as_int().unwrap())
            .collect();
        let second: Vec<i64> = graph
            .execute(&bindings)
            .unwrap()
            .map(|r| r.unwrap().get("n").unwrap().as_int().unwrap())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, vec![1, 2, 3]);
    }

    #[test]
    fn missing_binding_surfaces_as_an_error() {
        let bindings = Bindings::new();
        let graph = Graph::from_iter("missing");
        assert!(matches!(graph.execute(&bindings), Err(Error::MissingBinding { .. })));
    }

    #[test]
    fn sort_then_reduce_groups_every_equal_key_exactly_once() {
        let mut bindings = Bindings::new();
        bindings.insert("src".to_string(), rows_binding(vec![1, 2, 1, 2, 1]));

        let graph = Graph::from_iter("src")
            .sort(vec!["n".to_string()])
            .reduce(Count::new("count"), vec!["n".to_string()]);

        let rows: Vec<Row> = graph.execute(&bindings).unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("count"), Some(&Value::Int(3)));
        assert_eq!(rows[1].get("count"), Some(&Value::Int(2)));
    }
}
