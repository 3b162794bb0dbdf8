pub mod abstract_index;
pub mod doi;
mod error;
pub mod goals;
pub mod normalize;
pub mod prediction;
pub mod work;

pub use abstract_index::{InvertedIndex, deabstract};
pub use doi::normalize_doi;
pub use error::CoreError;
pub use goals::{GOAL_COUNT, GOALS, Goal, SdgGoal};
pub use normalize::classification_text;
pub use prediction::Prediction;
pub use work::Work;
