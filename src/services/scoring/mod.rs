//! Recipe scoring: a cold-start similarity score and a per-user learned model.

pub mod forest;
pub mod learned;
pub mod similarity;

pub use forest::ForestParams;
pub use learned::{train, TrainedModel};
pub use similarity::similarity_score;

use crate::models::{PreferenceVector, Recipe};

/// Share of the learned prediction in a blended score
pub const DEFAULT_BLEND_WEIGHT: f64 = 0.5;

/// Scoring knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Weight `w` in `w * learned + (1 - w) * similarity`
    pub blend_weight: f64,
    pub forest: ForestParams,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            blend_weight: DEFAULT_BLEND_WEIGHT,
            forest: ForestParams::default(),
        }
    }
}

/// Score for one recipe and user
///
/// Uses the similarity score alone without a model, or when the model cannot
/// encode the recipe.
pub fn predict_recipe_score(
    recipe: &Recipe,
    preferences: &PreferenceVector,
    model: Option<&TrainedModel>,
    config: &ScoringConfig,
) -> f64 {
    let similarity = similarity_score(&recipe.taste, preferences);

    let Some(model) = model else {
        return similarity;
    };

    match model.predict(recipe) {
        Some(learned) => {
            let weight = config.blend_weight.clamp(0.0, 1.0);
            weight * learned + (1.0 - weight) * similarity
        }
        None => {
            tracing::debug!(
                title = %recipe.title,
                cuisine = %recipe.cuisine,
                "Model could not encode recipe, using similarity score"
            );
            similarity
        }
    }
}
