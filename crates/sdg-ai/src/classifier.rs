//! SDG classification over a pretrained sequence classifier.
//!
//! The pipeline is split at two seams so the orchestration can be exercised
//! without model artifacts:
//!
//! - [`TokenEncoder`]: marked text → vocabulary ids
//! - [`ScoreModel`]: padded ids + attention mask → one score per goal
//!
//! [`SdgClassifier`] glues them together and implements [`Classify`], the
//! interface the HTTP layer and CLI depend on.

use sdg_core::Prediction;
use tracing::debug;

use crate::ClassifyError;
use crate::prepare::{DEFAULT_MAX_LEN, ModelInput, mark_sentences};
use crate::ranking::rank;

/// Encodes already-marked text into vocabulary ids.
///
/// Implementations must not add special tokens of their own; `[CLS]` and
/// `[SEP]` are already present in the text.
pub trait TokenEncoder: Send + Sync {
    fn encode_ids(&self, text: &str) -> Result<Vec<u32>, ClassifyError>;
}

/// Runs the pretrained classifier on one prepared input.
pub trait ScoreModel: Send + Sync {
    fn scores(&self, input: &ModelInput) -> Result<Vec<f32>, ClassifyError>;
}

/// Text → 17 predictions sorted by descending score.
pub trait Classify: Send + Sync {
    fn classify(&self, text: &str) -> Result<Vec<Prediction>, ClassifyError>;
}

/// Tokenizer + model pair with a fixed input length.
pub struct SdgClassifier<E, M> {
    encoder: E,
    model: M,
    max_len: usize,
}

impl<E: TokenEncoder, M: ScoreModel> SdgClassifier<E, M> {
    pub fn new(encoder: E, model: M, max_len: usize) -> Self {
        Self {
            encoder,
            model,
            max_len,
        }
    }

    pub fn with_default_len(encoder: E, model: M) -> Self {
        Self::new(encoder, model, DEFAULT_MAX_LEN)
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Mark sentences, encode, then truncate/pad to `max_len`.
    pub fn prepare(&self, text: &str) -> Result<ModelInput, ClassifyError> {
        let marked = mark_sentences(text);
        let ids = self.encoder.encode_ids(&marked)?;
        if ids.len() > self.max_len {
            debug!(
                tokens = ids.len(),
                max_len = self.max_len,
                "truncating classifier input"
            );
        }
        Ok(ModelInput::from_ids(&ids, self.max_len))
    }
}

impl<E: TokenEncoder, M: ScoreModel> Classify for SdgClassifier<E, M> {
    fn classify(&self, text: &str) -> Result<Vec<Prediction>, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::EmptyText);
        }
        let input = self.prepare(text)?;
        let scores = self.model.scores(&input)?;
        rank(&scores)
    }
}
