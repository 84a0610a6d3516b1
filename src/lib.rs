//! A computational-graph library for lazy, pull-based tabular stream
//! processing: compose map/reduce/sort/join stages over row streams and
//! execute the resulting graph against a set of named bindings.

pub mod bindings;
pub mod error;
pub mod graph;
pub mod ops;
pub mod pipelines;
pub mod row;
pub mod stream;
pub mod traits;
pub mod transforms;
pub mod value;

///
/// Prelude
///
/// Contains only the vocabulary needed to build and run a graph.
///

pub mod prelude {
    pub use crate::{
        bindings::{Binding, Bindings},
        error::Error,
        graph::Graph,
        row::Row,
        stream::RowStream,
        traits::{Joiner, Mapper, Reducer},
        value::Value,
    };
}
