/// Spoonacular-compatible recipe API provider
///
/// API Flow:
/// 1. Search: /recipes/findByIngredients → candidate ids, titles, missed ingredients
/// 2. Details: /recipes/{id}/information → cuisines, dish types, optional taste fields
/// 3. Classification: POST /recipes/cuisine → best-guess cuisine with confidence
///
/// Every response is cached in Redis for the configured TTL.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiCuisineClassification, ApiRecipeMatch, Cuisine, RecipeCandidate, RecipeDetails, RecipeId},
    services::providers::{RecipeProvider, CLASSIFICATION_CONFIDENCE_THRESHOLD},
};
use reqwest::{Client as HttpClient, Response};
use std::time::Duration;

/// Ranking mode 2 asks the API to minimize missing ingredients
const SEARCH_RANKING: &str = "2";

#[derive(Clone)]
pub struct SpoonacularProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
    result_count: usize,
}

impl SpoonacularProvider {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        cache_ttl: u64,
        result_count: usize,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
            result_count,
        })
    }

    async fn ensure_success(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::ExternalApi(format!(
            "Recipe API returned status {}: {}",
            status, body
        )))
    }
}

/// Keeps a classification only when it is confident and maps onto the vocabulary
fn accept_classification(classification: &ApiCuisineClassification) -> Option<Cuisine> {
    if classification.confidence <= CLASSIFICATION_CONFIDENCE_THRESHOLD {
        return None;
    }
    Cuisine::from_tag(&classification.cuisine)
}

#[async_trait::async_trait]
impl RecipeProvider for SpoonacularProvider {
    async fn search_recipes(&self, ingredients: &[String]) -> AppResult<Vec<RecipeCandidate>> {
        let cleaned: Vec<String> = ingredients
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        if cleaned.is_empty() {
            return Err(AppError::InvalidInput(
                "Ingredient list cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::RecipeSearch(cleaned.clone()),
            self.cache_ttl,
            async {
                let url = format!("{}/recipes/findByIngredients", self.api_url);
                let number = self.result_count.to_string();
                let joined = cleaned.join(",");

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("apiKey", self.api_key.as_str()),
                        ("ingredients", joined.as_str()),
                        ("number", number.as_str()),
                        ("ranking", SEARCH_RANKING),
                    ])
                    .send()
                    .await?;

                let response = Self::ensure_success(response).await?;
                let matches: Vec<ApiRecipeMatch> = response.json().await.map_err(|e| {
                    AppError::ExternalApi(format!("Failed to parse recipe search response: {}", e))
                })?;

                let candidates: Vec<RecipeCandidate> =
                    matches.into_iter().map(RecipeCandidate::from).collect();

                tracing::info!(
                    ingredients = cleaned.len(),
                    results = candidates.len(),
                    provider = "spoonacular",
                    "Recipe search completed"
                );

                Ok::<_, AppError>(candidates)
            }
        )
    }

    async fn fetch_recipe_details(&self, id: RecipeId) -> AppResult<RecipeDetails> {
        cached!(
            self.cache,
            CacheKey::RecipeDetails(id),
            self.cache_ttl,
            async {
                let url = format!("{}/recipes/{}/information", self.api_url, id);

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("apiKey", self.api_key.as_str()),
                        ("includeNutrition", "false"),
                    ])
                    .send()
                    .await?;

                let response = Self::ensure_success(response).await?;
                let response_text = response.text().await?;
                tracing::debug!(recipe_id = %id, response = %response_text, "Raw recipe details");

                let details: RecipeDetails =
                    serde_json::from_str(&response_text).map_err(|e| {
                        tracing::error!(error = %e, recipe_id = %id, "Failed to deserialize recipe details");
                        AppError::ExternalApi(format!("Failed to parse recipe details: {}", e))
                    })?;

                Ok::<_, AppError>(details)
            }
        )
    }

    async fn classify_cuisine(&self, title: &str) -> AppResult<Option<Cuisine>> {
        let classification: AppResult<ApiCuisineClassification> = cached!(
            self.cache,
            CacheKey::CuisineClassification(title.to_string()),
            self.cache_ttl,
            async {
                let url = format!("{}/recipes/cuisine", self.api_url);

                let response = self
                    .http_client
                    .post(&url)
                    .query(&[("apiKey", self.api_key.as_str())])
                    .form(&[("title", title), ("ingredientList", title)])
                    .send()
                    .await?;

                let response = Self::ensure_success(response).await?;
                let classification: ApiCuisineClassification =
                    response.json().await.map_err(|e| {
                        AppError::ExternalApi(format!("Failed to parse cuisine classification: {}", e))
                    })?;

                Ok::<_, AppError>(classification)
            }
        );
        let classification = classification?;

        let cuisine = accept_classification(&classification);
        tracing::debug!(
            title = %title,
            raw = %classification.cuisine,
            confidence = classification.confidence,
            accepted = ?cuisine,
            "Cuisine classified"
        );
        Ok(cuisine)
    }

    fn name(&self) -> &'static str {
        "spoonacular"
    }
}
