use std::collections::{BTreeMap, HashMap};

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{Cuisine, PreferenceVector, Rating, RatingRecord, TasteDimension},
    services::{
        catalog::RecipeCatalog,
        ledger::{LowRatedSet, RatingLedger},
        scoring::{self, ForestParams, TrainedModel},
    },
};

/// Everything the core keeps for one user
///
/// Contexts are never shared between users; the caller owns the mapping from
/// user id to context.
#[derive(Debug, Clone)]
pub struct UserContext {
    user_id: String,
    pub preferences: PreferenceVector,
    ledger: RatingLedger,
    low_rated: LowRatedSet,
    model: Option<TrainedModel>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            preferences: PreferenceVector::new(),
            ledger: RatingLedger::new(),
            low_rated: LowRatedSet::new(),
            model: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn ledger(&self) -> &RatingLedger {
        &self.ledger
    }

    pub fn low_rated(&self) -> &LowRatedSet {
        &self.low_rated
    }

    pub fn trained_model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Records a rating and brings the low-rated set and model up to date
    ///
    /// Input is validated before anything changes. On success the ledger,
    /// low-rated set and model all reflect the new rating.
    pub fn submit_rating(
        &mut self,
        title: &str,
        cuisine: Cuisine,
        rating: u8,
        catalog: &RecipeCatalog,
        params: &ForestParams,
    ) -> AppResult<RatingRecord> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput(
                "Recipe title cannot be empty".to_string(),
            ));
        }
        let rating = Rating::try_from(rating).map_err(AppError::InvalidInput)?;

        let record = RatingRecord {
            user: self.user_id.clone(),
            title: title.to_string(),
            cuisine,
            rating,
            rated_at: Utc::now(),
        };

        self.ledger.append(record.clone());
        self.low_rated.apply(title, rating);
        self.model = scoring::train(&self.ledger, catalog, params);

        tracing::info!(
            user_id = %self.user_id,
            title = %record.title,
            rating = rating.value(),
            ratings = self.ledger.len(),
            model_trained = self.model.is_some(),
            "Rating recorded"
        );

        Ok(record)
    }

    /// Replaces any subset of taste preferences; all-or-nothing
    pub fn update_preferences(
        &mut self,
        updates: &BTreeMap<TasteDimension, u8>,
    ) -> AppResult<()> {
        self.preferences
            .update(updates)
            .map_err(AppError::InvalidInput)
    }

    pub fn reset_preferences(&mut self) {
        self.preferences.reset();
    }

    /// Mean rating per cuisine over every rating ever submitted
    pub fn cuisine_affinity(&self) -> HashMap<Cuisine, f64> {
        self.ledger.cuisine_affinity()
    }

    /// Specific cuisines the user has never rated, in vocabulary order
    pub fn unrated_cuisines(&self) -> Vec<Cuisine> {
        let rated = self.cuisine_affinity();
        Cuisine::SPECIFIC
            .iter()
            .copied()
            .filter(|cuisine| !rated.contains_key(cuisine))
            .collect()
    }
}
