use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod cuisine;
pub mod preferences;
pub mod rating;
pub mod taste;

pub use cuisine::Cuisine;
pub use preferences::PreferenceVector;
pub use rating::{Rating, RatingRecord, LOW_RATING_THRESHOLD};
pub use taste::{TasteDimension, TasteProfile};

/// External identifier of a recipe at the recipe API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub u64);

impl Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A taste-profiled recipe; immutable once built
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub link: String,
    pub cuisine: Cuisine,
    pub taste: TasteProfile,
}

/// A recipe as returned by an ingredient search, before profiling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeCandidate {
    pub id: RecipeId,
    pub title: String,
    pub missing_ingredients: Vec<String>,
}

/// A profiled recipe together with what the household still needs to buy
#[derive(Debug, Clone, PartialEq)]
pub struct ProfiledCandidate {
    pub recipe: Recipe,
    pub missing_ingredients: Vec<String>,
}

/// One ranked entry of a recommendation list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub link: String,
    pub cuisine: Cuisine,
    pub missing_ingredients: Vec<String>,
    pub score: f64,
}

/// Best-effort recipe detail payload; any field may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub dish_types: Vec<String>,
    #[serde(default)]
    pub spiciness: Option<f64>,
    #[serde(default)]
    pub sweetness: Option<f64>,
    #[serde(default)]
    pub saltiness: Option<f64>,
    #[serde(default)]
    pub sourness: Option<f64>,
    #[serde(default)]
    pub bitterness: Option<f64>,
    #[serde(default)]
    pub savoriness: Option<f64>,
}

impl RecipeDetails {
    /// Raw payload value for a taste dimension
    pub fn taste_field(&self, dimension: TasteDimension) -> Option<f64> {
        match dimension {
            TasteDimension::Spicy => self.spiciness,
            TasteDimension::Sweet => self.sweetness,
            TasteDimension::Salty => self.saltiness,
            TasteDimension::Sour => self.sourness,
            TasteDimension::Bitter => self.bitterness,
            TasteDimension::Umami => self.savoriness,
        }
    }
}

// ============================================================================
// Recipe API Types
// ============================================================================

/// Raw result of the find-by-ingredients endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecipeMatch {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub missed_ingredients: Vec<ApiIngredient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiIngredient {
    pub name: String,
}

impl From<ApiRecipeMatch> for RecipeCandidate {
    fn from(api: ApiRecipeMatch) -> Self {
        RecipeCandidate {
            id: RecipeId(api.id),
            title: api.title.trim().to_string(),
            missing_ingredients: api
                .missed_ingredients
                .into_iter()
                .map(|ingredient| ingredient.name)
                .collect(),
        }
    }
}

/// Raw result of the cuisine classification endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCuisineClassification {
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub confidence: f64,
}
