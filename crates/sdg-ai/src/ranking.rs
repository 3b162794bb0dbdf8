use std::cmp::Ordering;

use sdg_core::{GOAL_COUNT, GOALS, Prediction};

use crate::ClassifyError;

/// Pair raw model scores with their goals and sort by descending score.
///
/// `scores[i]` belongs to goal `i + 1`. The sort is stable, so equal scores
/// keep ascending goal order.
pub fn rank(scores: &[f32]) -> Result<Vec<Prediction>, ClassifyError> {
    if scores.len() != GOAL_COUNT {
        return Err(ClassifyError::UnexpectedOutput {
            expected: GOAL_COUNT,
            got: scores.len(),
        });
    }
    if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ClassifyError::NonFiniteScore { goal: i + 1 });
    }

    let mut predictions: Vec<Prediction> = GOALS
        .iter()
        .zip(scores)
        .map(|(goal, &score)| Prediction::new(goal, score))
        .collect();

    predictions.sort_by(|a, b| {
        b.prediction
            .partial_cmp(&a.prediction)
            .unwrap_or(Ordering::Equal)
    });
    Ok(predictions)
}
