//! Error types for course_drills.

use thiserror::Error;

/// Result type alias using PageError.
pub type Result<T> = std::result::Result<T, PageError>;

/// Problems with one exercise's authored structure.
///
/// A markup error only ever skips the exercise it belongs to; the rest of the
/// page still mounts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("container {container}: missing item list")]
    MissingList { container: String },

    #[error("container {container}: missing answer bank")]
    MissingAnswerBank { container: String },

    #[error("container {container}: no buckets besides the answer bank")]
    NoBuckets { container: String },

    #[error("container {container}: exercise has no items")]
    Empty { container: String },

    /// A pair id must cover an even number of items. An id reused for four
    /// items forms two interchangeable pairs.
    #[error("container {container}: pair id {pair_id} occurs {count} time(s), expected an even count")]
    UnpairedItem { container: String, pair_id: String, count: usize },

    #[error("container {container}: item {text:?} is tagged for unknown bucket {bucket:?}")]
    UnknownBucket { container: String, text: String, bucket: String },

    #[error("container {container}: bucket label {label:?} is used more than once")]
    DuplicateBucket { container: String, label: String },
}

/// Errors that stop a whole page from being built.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("malformed page document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
