use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActivityError {
    /// The combined query is at least as large as the ranked list, leaving
    /// no miss positions to normalize against.
    #[error("invalid query size: {query_size} query genes against a ranked list of {ranked_len}")]
    InvalidQuerySize { query_size: usize, ranked_len: usize },

    /// No position of the ranked list is a hit for the query.
    #[error("query has no overlap with the ranked list")]
    EmptyQueryOverlap,

    #[error("cannot sample {requested} genes from a universe of {universe}")]
    SamplingImpossible { requested: usize, universe: usize },

    #[error("gene score map is empty")]
    EmptyScores,

    #[error("non-finite score for gene: {gene}")]
    NonFiniteScore { gene: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ActivityError>;
