use serde::{Deserialize, Serialize};

use crate::goals::{Goal, SdgGoal};
use crate::CoreError;

/// Classifier confidence for one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: f32,
    pub sdg: SdgGoal,
}

impl Prediction {
    pub fn new(goal: &Goal, score: f32) -> Self {
        Self {
            prediction: score,
            sdg: SdgGoal::from(goal),
        }
    }

    pub fn goal(&self) -> Result<&'static Goal, CoreError> {
        self.sdg.goal()
    }
}
