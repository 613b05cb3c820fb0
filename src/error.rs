#[derive(Debug, thiserror::Error)]
pub enum CryptodashError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Fewer complete weeks survived the weekday filter than the analysis needs.
    #[error("Insufficient data: {complete_weeks} complete week(s), at least {required} required")]
    InsufficientData { complete_weeks: usize, required: usize },

    /// Price samples were out of order or repeated a timestamp.
    #[error(
        "Non-monotonic input at sample {index}: timestamp {current_ms} does not follow {previous_ms}"
    )]
    NonMonotonicInput {
        index: usize,
        previous_ms: i64,
        current_ms: i64,
    },
}

pub type Result<T> = std::result::Result<T, CryptodashError>;
