//! ONNX Runtime backend for the SDG classifier.
//!
//! The model directory must contain `model.onnx` (a BERT sequence classifier
//! with a 17-way sigmoid head) and `tokenizer.json` (the vocabulary it was
//! trained with, e.g. bert-base-multilingual-uncased).

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use sdg_core::GOAL_COUNT;
use tokenizers::Tokenizer;
use tracing::{info, warn};

use crate::ClassifyError;
use crate::classifier::{ScoreModel, SdgClassifier, TokenEncoder};
use crate::prepare::{DEFAULT_MAX_LEN, ModelInput};

/// Classifier backed by a HuggingFace tokenizer and an ONNX session.
pub type OnnxClassifier = SdgClassifier<Tokenizer, OnnxModel>;

/// Load-time settings for [`OnnxClassifier::load`].
#[derive(Debug, Clone)]
pub struct OnnxOptions {
    pub max_len: usize,
    /// Graph input name for the token ids.
    pub ids_input: String,
    /// Graph input name for the attention mask.
    pub mask_input: String,
}

impl Default for OnnxOptions {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
            ids_input: "input_ids".to_string(),
            mask_input: "attention_mask".to_string(),
        }
    }
}

impl TokenEncoder for Tokenizer {
    fn encode_ids(&self, text: &str) -> Result<Vec<u32>, ClassifyError> {
        let encoding = self
            .encode(text, false)
            .map_err(|e| ClassifyError::Tokenize(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }
}

/// ONNX session producing one score per goal.
///
/// `Session::run` needs `&mut`, so concurrent requests take turns on the lock.
pub struct OnnxModel {
    session: Mutex<Session>,
    ids_input: String,
    mask_input: String,
}

impl OnnxModel {
    pub fn load(model_path: &Path, options: &OnnxOptions) -> anyhow::Result<Self> {
        anyhow::ensure!(model_path.exists(), "{model_path:?} not found");

        let session = Session::builder()?.commit_from_file(model_path)?;

        match infer_label_count(session.outputs()[0].dtype()) {
            Some(n) if n != GOAL_COUNT => {
                warn!(labels = n, expected = GOAL_COUNT, "model head size mismatch")
            }
            _ => {}
        }

        Ok(Self {
            session: Mutex::new(session),
            ids_input: options.ids_input.clone(),
            mask_input: options.mask_input.clone(),
        })
    }
}

impl ScoreModel for OnnxModel {
    fn scores(&self, input: &ModelInput) -> Result<Vec<f32>, ClassifyError> {
        let shape = [1i64, input.len() as i64];
        let ids_tensor = Tensor::from_array((shape, input.input_ids.clone().into_boxed_slice()))?;
        let mask_tensor =
            Tensor::from_array((shape, input.attention_mask.clone().into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifyError::Model("onnx session lock poisoned".into()))?;

        let outputs = session.run(ort::inputs![
            self.ids_input.as_str() => ids_tensor,
            self.mask_input.as_str() => mask_tensor,
        ])?;

        // Sigmoid scores: [1, 17].
        let (_, scores) = outputs[0].try_extract_tensor::<f32>()?;
        Ok(scores.to_vec())
    }
}

impl SdgClassifier<Tokenizer, OnnxModel> {
    /// Load `model.onnx` and `tokenizer.json` from `model_dir`.
    pub fn load(model_dir: &Path, options: &OnnxOptions) -> anyhow::Result<Self> {
        anyhow::ensure!(options.max_len > 0, "max_len must be at least 1");

        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let model = OnnxModel::load(&model_path, options)?;

        // Truncation and padding happen in `ModelInput`, after sentence marking.
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("disable truncation: {e}"))?;
        tokenizer.with_padding(None);

        info!(
            max_len = options.max_len,
            model = %model_path.display(),
            "loaded SDG classifier"
        );
        Ok(Self::new(tokenizer, model, options.max_len))
    }
}

/// Try to read the label count from the model's output type.
fn infer_label_count(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
