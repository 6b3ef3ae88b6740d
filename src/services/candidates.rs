use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{ProfiledCandidate, Recipe, RecipeCandidate, RecipeDetails, RecipeId},
    services::{
        providers::RecipeProvider,
        taste::{extract_taste_profile, CuisineEvidence, CuisinePolicy},
    },
};

const RECIPE_LINK_BASE: &str = "https://spoonacular.com/recipes";

/// Leading words that mark a search hit as a question rather than a recipe
const QUESTION_WORDS: &[&str] = &["what", "how", "why", "when", "where", "who", "which"];

/// Candidates plus the provider that produced them
///
/// Detail lookups must go to the same provider, since ids are provider-local.
pub struct CandidateSearch {
    pub candidates: Vec<RecipeCandidate>,
    pub provider: Arc<dyn RecipeProvider>,
}

/// Searches the primary provider, falling back to the backup catalog
///
/// Fails with [`AppError::Unavailable`] when the primary fails and no backup
/// is configured.
pub async fn search_candidates(
    primary: Arc<dyn RecipeProvider>,
    backup: Option<Arc<dyn RecipeProvider>>,
    ingredients: &[String],
) -> AppResult<CandidateSearch> {
    match primary.search_recipes(ingredients).await {
        Ok(candidates) => Ok(CandidateSearch {
            candidates,
            provider: primary,
        }),
        Err(AppError::InvalidInput(msg)) => Err(AppError::InvalidInput(msg)),
        Err(e) => {
            let Some(backup) = backup else {
                tracing::error!(
                    error = %e,
                    provider = primary.name(),
                    "Recipe search failed and no backup is configured"
                );
                return Err(AppError::Unavailable(format!(
                    "Recipe search is unavailable: {}",
                    e
                )));
            };

            tracing::warn!(
                error = %e,
                provider = primary.name(),
                fallback = backup.name(),
                "Recipe search failed, using backup catalog"
            );
            let candidates = backup.search_recipes(ingredients).await?;
            Ok(CandidateSearch {
                candidates,
                provider: backup,
            })
        }
    }
}

/// Whether a search hit looks like a recipe title
pub fn is_valid_title(title: &str) -> bool {
    let title = title.trim();
    if title.is_empty() || title.contains('?') {
        return false;
    }

    let first_word = title
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    !QUESTION_WORDS.contains(&first_word.as_str())
}

/// Drops question-like titles and recipes needing too many extra ingredients
pub fn filter_candidates(
    candidates: Vec<RecipeCandidate>,
    max_missing_ingredients: usize,
) -> Vec<RecipeCandidate> {
    let before = candidates.len();
    let kept: Vec<RecipeCandidate> = candidates
        .into_iter()
        .filter(|c| is_valid_title(&c.title))
        .filter(|c| c.missing_ingredients.len() <= max_missing_ingredients)
        .collect();

    tracing::debug!(
        before,
        after = kept.len(),
        max_missing_ingredients,
        "Filtered recipe candidates"
    );
    kept
}

/// Public page for a recipe: `{base}/{slug}-{id}`
pub fn recipe_link(id: RecipeId, title: &str) -> String {
    let slug: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '-')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect::<String>()
        .to_lowercase();

    format!("{}/{}-{}", RECIPE_LINK_BASE, slug, id)
}

/// Taste-profiles candidates, reusing already-known recipes
///
/// `known` is keyed by title, since ids from different providers overlap.
/// Unknown recipes have their details fetched in parallel. A failed fetch
/// degrades to an empty payload, so the recipe gets neutral taste and a
/// fallback cuisine instead of being dropped. Output order follows input order.
pub async fn profile_candidates(
    provider: Arc<dyn RecipeProvider>,
    candidates: Vec<RecipeCandidate>,
    known: &HashMap<String, Recipe>,
    policy: &CuisinePolicy,
) -> Vec<ProfiledCandidate> {
    let mut tasks = Vec::new();

    for candidate in &candidates {
        if known.contains_key(&candidate.title) {
            continue;
        }
        let provider = Arc::clone(&provider);
        let policy = policy.clone();
        let id = candidate.id;
        let title = candidate.title.clone();
        let task = tokio::spawn(async move { profile_recipe(provider, id, title, &policy).await });
        tasks.push((candidate.id, task));
    }

    let mut fetched: HashMap<RecipeId, Recipe> = HashMap::new();
    for (id, task) in tasks {
        match task.await {
            Ok(recipe) => {
                fetched.insert(id, recipe);
            }
            Err(e) => {
                tracing::warn!(recipe_id = %id, error = %e, "Profiling task failed");
            }
        }
    }

    tracing::info!(
        candidates = candidates.len(),
        cached = candidates.len() - fetched.len(),
        fetched = fetched.len(),
        "Profiled recipe candidates"
    );

    candidates
        .into_iter()
        .filter_map(|candidate| {
            let recipe = known
                .get(&candidate.title)
                .cloned()
                .or_else(|| fetched.remove(&candidate.id))?;
            Some(ProfiledCandidate {
                recipe,
                missing_ingredients: candidate.missing_ingredients,
            })
        })
        .collect()
}

/// Builds one profiled recipe from its detail payload
async fn profile_recipe(
    provider: Arc<dyn RecipeProvider>,
    id: RecipeId,
    title: String,
    policy: &CuisinePolicy,
) -> Recipe {
    let details = match provider.fetch_recipe_details(id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(
                recipe_id = %id,
                error = %e,
                "Recipe details unavailable, using neutral profile"
            );
            RecipeDetails::default()
        }
    };

    let evidence = CuisineEvidence {
        id,
        title: &title,
        details: &details,
    };

    let classified = if policy.needs_classification(&evidence) {
        match provider.classify_cuisine(&title).await {
            Ok(cuisine) => cuisine,
            Err(e) => {
                tracing::warn!(recipe_id = %id, error = %e, "Cuisine classification failed");
                None
            }
        }
    } else {
        None
    };

    let cuisine = policy.resolve(&evidence, classified);
    let taste = extract_taste_profile(&details);

    tracing::debug!(recipe_id = %id, title = %title, cuisine = %cuisine, "Recipe profiled");

    Recipe {
        id,
        link: recipe_link(id, &title),
        title,
        cuisine,
        taste,
    }
}
