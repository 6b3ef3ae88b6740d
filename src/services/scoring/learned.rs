use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forest::{ForestParams, RandomForest, Standardizer};
use crate::{
    models::{Cuisine, Recipe, TasteDimension},
    services::{catalog::RecipeCatalog, ledger::RatingLedger},
};

/// Fewest joined rows a model is trained on
pub const MIN_TRAINING_ROWS: usize = 2;

/// Maps a recipe to its feature row: taste levels then a one-hot cuisine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    dimensions: Vec<TasteDimension>,
    cuisines: Vec<Cuisine>,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self {
            dimensions: TasteDimension::ALL.to_vec(),
            cuisines: Cuisine::ALL.to_vec(),
        }
    }
}

impl FeatureEncoder {
    pub fn width(&self) -> usize {
        self.dimensions.len() + self.cuisines.len()
    }

    pub fn cuisines(&self) -> &[Cuisine] {
        &self.cuisines
    }

    /// Feature row, or `None` when a dimension is unrecorded or the cuisine is outside the vocabulary
    pub fn encode(&self, recipe: &Recipe) -> Option<Vec<f64>> {
        let mut row = Vec::with_capacity(self.width());
        for dimension in &self.dimensions {
            row.push(recipe.taste.recorded(*dimension)?);
        }

        let hot = self.cuisines.iter().position(|c| *c == recipe.cuisine)?;
        row.extend((0..self.cuisines.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
        Some(row)
    }
}

/// Per-user rating predictor
///
/// Self-contained and serializable so a persistence layer can store it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    encoder: FeatureEncoder,
    scaler: Standardizer,
    forest: RandomForest,
    rows: usize,
    trained_at: DateTime<Utc>,
}

impl TrainedModel {
    /// Predicted rating, or `None` when the recipe cannot be encoded
    pub fn predict(&self, recipe: &Recipe) -> Option<f64> {
        let row = self.encoder.encode(recipe)?;
        let scaled = self.scaler.transform(&row)?;
        let prediction = self.forest.predict(&scaled);
        prediction.is_finite().then_some(prediction)
    }

    /// Number of joined rows the model was fit on
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

/// Fits a fresh model from the full ledger
///
/// Each title contributes its latest rating, joined to the catalog on title
/// and cuisine. Ratings without a matching recipe are dropped. Returns `None`
/// when fewer than [`MIN_TRAINING_ROWS`] rows survive the join.
pub fn train(
    ledger: &RatingLedger,
    catalog: &RecipeCatalog,
    params: &ForestParams,
) -> Option<TrainedModel> {
    let encoder = FeatureEncoder::default();

    let (features, targets): (Vec<Vec<f64>>, Vec<f64>) = ledger
        .latest_by_title()
        .into_iter()
        .filter_map(|record| {
            let recipe = catalog.feature_row(&record.title, record.cuisine)?;
            let row = encoder.encode(recipe)?;
            Some((row, record.rating.value() as f64))
        })
        .unzip();

    if features.len() < MIN_TRAINING_ROWS {
        tracing::debug!(
            rows = features.len(),
            ratings = ledger.len(),
            "Not enough joined rows to train"
        );
        return None;
    }

    let scaler = Standardizer::fit(&features);
    let scaled: Vec<Vec<f64>> = features
        .iter()
        .filter_map(|row| scaler.transform(row))
        .collect();
    let forest = RandomForest::fit(&scaled, &targets, *params)?;

    Some(TrainedModel {
        encoder,
        scaler,
        forest,
        rows: targets.len(),
        trained_at: Utc::now(),
    })
}
