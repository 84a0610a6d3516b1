//! Built-in mappers, reducers, and joiners — the concrete
//! [`crate::traits::Mapper`] / [`crate::traits::Reducer`] / [`crate::traits::Joiner`]
//! implementations the pipelines compose.

pub mod joiner;
pub mod mapper;
pub mod reducer;

pub use joiner::{InnerJoiner, LeftJoiner, OuterJoiner, RightJoiner};
pub use mapper::{
    AddDummyColumn, AverageSpeed, CompHaversine, CompTimeDelta, ConvertToDatetime,
    DeleteDummyColumn, Filter, FilterPunctuation, GetWeekdayAndHour, LogarithmOfRatio, LowerCase,
    MoreFourCharacters, MoreTwice, Product, Project, Split,
};
pub use reducer::{Count, FirstReducer, Sum, TermFrequency, TopN};
