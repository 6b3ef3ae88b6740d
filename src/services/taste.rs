//! Taste profile extraction and cuisine resolution.
//!
//! Recipe detail payloads are best-effort: taste fields may be missing and
//! cuisine tags may be absent or outside our vocabulary. This module turns a
//! payload into a [`TasteProfile`] and picks a [`Cuisine`] by walking an
//! ordered [`CuisinePolicy`].

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Deserialize;

use crate::models::{
    taste::{MAX_LEVEL, NEUTRAL_LEVEL},
    Cuisine, RecipeDetails, RecipeId, TasteDimension, TasteProfile,
};

/// Title keywords checked in order; the first hit wins
const TITLE_KEYWORDS: &[(&[&str], Cuisine)] = &[
    (&["pasta", "pizza", "risotto", "lasagna", "spaghetti", "gnocchi", "italian"], Cuisine::Italian),
    (&["curry", "masala", "tikka", "tandoori", "biryani", "indian"], Cuisine::Indian),
    (&["taco", "burrito", "enchilada", "quesadilla", "fajita", "mexican"], Cuisine::Mexican),
    (&["stir fry", "sushi", "ramen", "udon", "pad thai", "pho", "kimchi", "teriyaki", "asian"], Cuisine::Asian),
    (&["burger", "bbq", "grill", "mac and cheese", "american"], Cuisine::American),
    (&["mediterranean", "greek", "hummus", "falafel", "gyro", "souvlaki", "shawarma", "paella"], Cuisine::Mediterranean),
];

/// Dish types that imply a cuisine on their own
const DISH_TYPES: &[(&str, Cuisine)] = &[
    ("antipasti", Cuisine::Italian),
    ("antipasto", Cuisine::Italian),
    ("mezze", Cuisine::Mediterranean),
    ("tapas", Cuisine::Mediterranean),
    ("dim sum", Cuisine::Asian),
    ("barbecue", Cuisine::American),
];

/// One way of determining a recipe's cuisine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuisineSource {
    /// Cuisine tags in the detail payload
    Explicit,
    /// Keyword match on the recipe title
    TitleKeyword,
    /// The provider's cuisine classifier
    ApiClassification,
    /// Inference from the payload's dish types
    DishType,
}

/// What to assign when no source yields a cuisine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CuisineFallback {
    #[default]
    International,
    /// Pseudo-random specific cuisine, seeded from the recipe id
    Random,
}

/// Ordered cuisine resolution policy
#[derive(Debug, Clone, PartialEq)]
pub struct CuisinePolicy {
    pub order: Vec<CuisineSource>,
    pub fallback: CuisineFallback,
}

impl Default for CuisinePolicy {
    fn default() -> Self {
        Self {
            order: vec![
                CuisineSource::Explicit,
                CuisineSource::TitleKeyword,
                CuisineSource::ApiClassification,
                CuisineSource::DishType,
            ],
            fallback: CuisineFallback::International,
        }
    }
}

/// Everything known about a recipe when resolving its cuisine
#[derive(Debug, Clone, Copy)]
pub struct CuisineEvidence<'a> {
    pub id: RecipeId,
    pub title: &'a str,
    pub details: &'a RecipeDetails,
}

impl CuisinePolicy {
    /// Whether resolution reaches the classifier step without an earlier answer
    pub fn needs_classification(&self, evidence: &CuisineEvidence<'_>) -> bool {
        for source in &self.order {
            match source {
                CuisineSource::ApiClassification => return true,
                other => {
                    if Self::local_source(*other, evidence).is_some() {
                        return false;
                    }
                }
            }
        }
        false
    }

    /// Resolves the cuisine; `classified` is the classifier's answer, if one was obtained
    pub fn resolve(&self, evidence: &CuisineEvidence<'_>, classified: Option<Cuisine>) -> Cuisine {
        self.order
            .iter()
            .find_map(|source| match source {
                CuisineSource::ApiClassification => classified,
                other => Self::local_source(*other, evidence),
            })
            .unwrap_or_else(|| self.fallback_for(evidence.id))
    }

    fn local_source(source: CuisineSource, evidence: &CuisineEvidence<'_>) -> Option<Cuisine> {
        match source {
            CuisineSource::Explicit => evidence
                .details
                .cuisines
                .iter()
                .find_map(|tag| Cuisine::from_tag(tag)),
            CuisineSource::TitleKeyword => keyword_cuisine(evidence.title),
            CuisineSource::DishType => dish_type_cuisine(&evidence.details.dish_types),
            CuisineSource::ApiClassification => None,
        }
    }

    fn fallback_for(&self, id: RecipeId) -> Cuisine {
        match self.fallback {
            CuisineFallback::International => Cuisine::International,
            CuisineFallback::Random => {
                let mut rng = StdRng::seed_from_u64(id.0);
                Cuisine::SPECIFIC
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or_default()
            }
        }
    }
}

/// Cuisine implied by keywords in free text
pub fn keyword_cuisine(text: &str) -> Option<Cuisine> {
    let lower = text.to_lowercase();
    TITLE_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, cuisine)| *cuisine)
}

/// Cuisine implied by dish-type metadata
pub fn dish_type_cuisine(dish_types: &[String]) -> Option<Cuisine> {
    dish_types.iter().find_map(|dish_type| {
        let lower = dish_type.trim().to_lowercase();
        DISH_TYPES
            .iter()
            .find(|(name, _)| lower == *name)
            .map(|(_, cuisine)| *cuisine)
            .or_else(|| keyword_cuisine(&lower))
    })
}

/// Builds a taste profile from a detail payload
///
/// Missing fields default to neutral (3) and values above 5 are capped at 5.
pub fn extract_taste_profile(details: &RecipeDetails) -> TasteProfile {
    TasteProfile::from_levels(TasteDimension::ALL.map(|dimension| {
        let raw = details
            .taste_field(dimension)
            .filter(|v| v.is_finite())
            .unwrap_or(NEUTRAL_LEVEL);
        (dimension, raw.min(MAX_LEVEL))
    }))
}
