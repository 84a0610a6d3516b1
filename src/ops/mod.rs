mod group_reduce;
mod map;
mod sort_merge_join;
mod source;

pub mod external_sort;

pub use external_sort::ExternalSort;
pub use group_reduce::GroupReduce;
pub use map::Map;
pub use sort_merge_join::SortMergeJoin;
pub use source::{LineParser, ReadFromFile, ReadFromIterator, default_parser, format_row};
