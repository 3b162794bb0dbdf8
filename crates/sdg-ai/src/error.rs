use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no text to classify")]
    EmptyText,

    #[error("tokenize: {0}")]
    Tokenize(String),

    #[error("model returned {got} scores, expected {expected}")]
    UnexpectedOutput { expected: usize, got: usize },

    #[error("model returned a non-finite score for goal {goal}")]
    NonFiniteScore { goal: usize },

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Onnx(#[from] ort::Error),

    #[error("{0}")]
    Model(String),
}
