//! Fixed compositions of the core engine into four concrete pipelines:
//! word count, TF-IDF, PMI, and average road-segment speed.

pub mod pmi;
pub mod road_speed;
pub mod tf_idf;
pub mod word_count;

pub use pmi::pmi_graph;
pub use road_speed::road_speed_graph;
pub use tf_idf::tf_idf_graph;
pub use word_count::word_count_graph;

use crate::{graph::Graph, ops::LineParser};

/// Builds a graph's source stage: a file source when a parser is supplied,
/// an iterator source otherwise. Mirrors how each pipeline is driven either
/// by a CLI binary (file bindings, `Some(parser)`) or directly by tests
/// (iterator bindings of pre-built rows, `None`).
fn from_source(input_stream_name: &str, parser: Option<LineParser>) -> Graph {
    match parser {
        Some(parser) => Graph::from_file(input_stream_name, Some(parser)),
        None => Graph::from_iter(input_stream_name),
    }
}

/// The datetime format used by the road-speed pipeline's trip timestamps.
/// The primary format's fractional-seconds suffix (`.%f`) falls back to a
/// bare-seconds parse for inputs that omit it.
pub(crate) const TRIP_TIME_FORMAT: &str = "%Y%m%dT%H%M%S.%f";
