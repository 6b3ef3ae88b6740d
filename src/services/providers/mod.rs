/// Recipe data provider abstraction
///
/// The recommendation core never talks to the network itself. Candidate
/// recipes and their details come from a `RecipeProvider`: either the HTTP
/// recipe API or the built-in backup catalog.
use crate::{
    error::AppResult,
    models::{Cuisine, RecipeCandidate, RecipeDetails, RecipeId},
};

pub mod backup;
pub mod spoonacular;

pub use backup::BackupCatalogProvider;
pub use spoonacular::SpoonacularProvider;

/// Minimum confidence for an API cuisine classification to be trusted
pub const CLASSIFICATION_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Trait for recipe data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Finds recipes that use the given ingredients
    ///
    /// Each candidate lists the ingredients the household would still need.
    async fn search_recipes(&self, ingredients: &[String]) -> AppResult<Vec<RecipeCandidate>>;

    /// Fetches the detail payload for a recipe; any field may be missing
    async fn fetch_recipe_details(&self, id: RecipeId) -> AppResult<RecipeDetails>;

    /// Classifies a recipe title into the cuisine vocabulary
    ///
    /// `Ok(None)` means the provider had no confident answer.
    async fn classify_cuisine(&self, title: &str) -> AppResult<Option<Cuisine>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
