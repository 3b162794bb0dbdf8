//! SDG inference layer: text preparation, score ranking and the ONNX Runtime classifier.

mod classifier;
mod error;
pub mod prepare;
pub mod ranking;

pub use classifier::{Classify, ScoreModel, SdgClassifier, TokenEncoder};
pub use error::ClassifyError;
pub use prepare::{DEFAULT_MAX_LEN, ModelInput};
pub use ranking::rank;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::{OnnxClassifier, OnnxModel, OnnxOptions};
