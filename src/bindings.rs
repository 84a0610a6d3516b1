use crate::stream::RowStream;
use std::collections::HashMap;

///
/// Binding
///
/// A named, zero-argument, restartable thunk supplied to [`crate::graph::Graph::execute`].
/// Calling the same binding twice must yield two independent results of
/// the same content — that restartability is what lets a graph be
/// executed more than once.
///

pub enum Binding {
    /// Produces a fresh row stream on each call.
    Iter(Box<dyn Fn() -> RowStream>),
    /// Produces a filesystem path on each call.
    Path(Box<dyn Fn() -> String>),
}

impl Binding {
    pub fn from_iter_fn<F>(f: F) -> Self
    where
        F: Fn() -> RowStream + 'static,
    {
        Self::Iter(Box::new(f))
    }

    /// Binds a single, fixed path. The common case for CLI-driven pipelines.
    pub fn path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::Path(Box::new(move || path.clone()))
    }
}

/// The set of named bindings a graph is executed against.
pub type Bindings = HashMap<String, Binding>;
