use std::path::PathBuf;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured runtime error surfaced at the point a stream is advanced.
/// Every kind here is fatal: once a stream yields one, it must continue
/// to yield it (or end) rather than recover.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("no binding supplied for source '{name}'")]
    MissingBinding { name: String },

    #[error("io error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {} line {line_number}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line_number: usize,
        message: String,
    },

    #[error("row is missing column '{column}'")]
    MissingColumn { column: String },

    #[error("invalid value in column '{column}': {message}")]
    InvalidColumn { column: String, message: String },

    #[error("cannot compare column '{column}': {left} vs {right}")]
    KeyTypeMismatch {
        column: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("arithmetic error in column '{column}': {message}")]
    Arithmetic { column: String, message: String },
}
