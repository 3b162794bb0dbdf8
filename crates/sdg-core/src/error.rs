use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("inverted index position {position} for {word:?} is not positive")]
    InvalidPosition { word: String, position: i64 },

    #[error("inverted index position {position} for {word:?} exceeds the limit of {limit}")]
    PositionOutOfRange {
        word: String,
        position: i64,
        limit: usize,
    },

    #[error("unknown SDG goal: {0}")]
    UnknownGoal(String),
}
