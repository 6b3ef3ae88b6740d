use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{Cuisine, PreferenceVector, RatingRecord, Recipe, Recommendation, TasteDimension};
use crate::services::{
    candidates::{filter_candidates, profile_candidates, search_candidates},
    recommendations::{rank_recommendations, RankingOptions, RecommendationOutcome, DEFAULT_TOP_N},
    user_context::UserContext,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub diverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Ok,
    NoCandidates,
    EmptyInventory,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub status: RecommendationStatus,
    pub recommendations: Vec<Recommendation>,
}

impl From<RecommendationOutcome> for RecommendationResponse {
    fn from(outcome: RecommendationOutcome) -> Self {
        match outcome {
            RecommendationOutcome::Ranked(recommendations) => Self {
                status: RecommendationStatus::Ok,
                recommendations,
            },
            RecommendationOutcome::NoCandidates => Self {
                status: RecommendationStatus::NoCandidates,
                recommendations: vec![],
            },
            RecommendationOutcome::EmptyInventory => Self {
                status: RecommendationStatus::EmptyInventory,
                recommendations: vec![],
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub user_id: String,
    pub preferences: PreferenceVector,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub title: String,
    /// Defaults to the catalog's cuisine for the title
    #[serde(default)]
    pub cuisine: Option<String>,
    pub rating: u8,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub record: RatingRecord,
    pub low_rated: bool,
    pub model_trained: bool,
}

#[derive(Debug, Serialize)]
pub struct AffinityResponse {
    pub user_id: String,
    pub affinity: BTreeMap<Cuisine, f64>,
}

#[derive(Debug, Serialize)]
pub struct UnratedCuisinesResponse {
    pub user_id: String,
    pub cuisines: Vec<Cuisine>,
}

#[derive(Debug, Serialize)]
pub struct LowRatedResponse {
    pub user_id: String,
    pub titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub user_id: String,
    pub trained: bool,
    pub rows: Option<usize>,
    pub estimators: Option<usize>,
    /// Cuisine vocabulary the model encodes; others fall back to similarity
    pub cuisines: Option<Vec<Cuisine>>,
    pub trained_at: Option<DateTime<Utc>>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommend recipes for the ingredients on hand
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let options = RankingOptions {
        top_n: request.top_n.unwrap_or(DEFAULT_TOP_N),
        diverse: request.diverse,
    };
    if options.top_n == 0 {
        return Err(AppError::InvalidInput("top_n must be at least 1".to_string()));
    }

    let ingredients: Vec<String> = request
        .ingredients
        .iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Ok(Json(RecommendationOutcome::EmptyInventory.into()));
    }

    let user_id = request
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    tracing::info!(
        user_id = user_id.as_deref().unwrap_or("anonymous"),
        ingredients = ingredients.len(),
        top_n = options.top_n,
        diverse = options.diverse,
        "Recommendation requested"
    );

    let search = search_candidates(state.provider.clone(), state.backup.clone(), &ingredients).await?;
    let candidates = filter_candidates(search.candidates, state.settings.max_missing_ingredients);
    if candidates.is_empty() {
        return Ok(Json(RecommendationOutcome::NoCandidates.into()));
    }

    let known: HashMap<String, Recipe> = {
        let inner = state.inner.read().await;
        candidates
            .iter()
            .filter_map(|c| {
                inner
                    .catalog
                    .get_by_title(&c.title)
                    .map(|r| (c.title.clone(), r.clone()))
            })
            .collect()
    };

    let profiled = profile_candidates(
        search.provider,
        candidates,
        &known,
        &state.settings.cuisine_policy,
    )
    .await;

    let mut guard = state.inner.write().await;
    let inner = &mut *guard;
    let user = match user_id.as_deref() {
        Some(id) => Some(
            &*inner
                .users
                .entry(id.to_string())
                .or_insert_with(|| UserContext::new(id)),
        ),
        None => None,
    };
    let mut rng = StdRng::from_entropy();

    let outcome = rank_recommendations(
        profiled,
        user,
        &mut inner.catalog,
        &options,
        &state.settings.scoring,
        &mut rng,
    );

    Ok(Json(outcome.into()))
}

/// Get a user's taste preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<PreferencesResponse> {
    let inner = state.inner.read().await;
    let preferences = inner
        .users
        .get(&user_id)
        .map(|user| user.preferences.clone())
        .unwrap_or_default();

    Json(PreferencesResponse {
        user_id,
        preferences,
    })
}

/// Update some or all taste preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(updates): Json<BTreeMap<TasteDimension, u8>>,
) -> AppResult<Json<PreferencesResponse>> {
    let mut inner = state.inner.write().await;
    let user = inner.user_mut(&user_id);
    user.update_preferences(&updates)?;

    tracing::info!(user_id = %user_id, updated = updates.len(), "Preferences updated");

    Ok(Json(PreferencesResponse {
        preferences: user.preferences.clone(),
        user_id,
    }))
}

/// Reset a user's preferences to neutral
pub async fn reset_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<PreferencesResponse> {
    let mut inner = state.inner.write().await;
    let user = inner.user_mut(&user_id);
    user.reset_preferences();

    Json(PreferencesResponse {
        preferences: user.preferences.clone(),
        user_id,
    })
}

/// Record a rating and retrain the user's model
pub async fn submit_rating(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<SubmitRatingRequest>,
) -> AppResult<(StatusCode, Json<RatingResponse>)> {
    let explicit = request
        .cuisine
        .as_deref()
        .map(Cuisine::from_str)
        .transpose()
        .map_err(AppError::InvalidInput)?;

    let mut guard = state.inner.write().await;
    let inner = &mut *guard;

    let cuisine = explicit
        .or_else(|| {
            inner
                .catalog
                .get_by_title(request.title.trim())
                .map(|recipe| recipe.cuisine)
        })
        .unwrap_or_default();

    let user = inner
        .users
        .entry(user_id.clone())
        .or_insert_with(|| UserContext::new(&user_id));
    let record = user.submit_rating(
        &request.title,
        cuisine,
        request.rating,
        &inner.catalog,
        &state.settings.scoring.forest,
    )?;

    let response = RatingResponse {
        low_rated: user.low_rated().contains(&record.title),
        model_trained: user.trained_model().is_some(),
        record,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// List a user's full rating history
pub async fn get_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<RatingRecord>> {
    let inner = state.inner.read().await;
    let history = inner
        .users
        .get(&user_id)
        .map(|user| user.ledger().history().to_vec())
        .unwrap_or_default();
    Json(history)
}

/// Titles the user has rated low, which recommendations skip
pub async fn get_low_rated(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<LowRatedResponse> {
    let inner = state.inner.read().await;
    let titles = inner
        .users
        .get(&user_id)
        .map(|user| user.low_rated().titles().map(str::to_string).collect())
        .unwrap_or_default();

    Json(LowRatedResponse { user_id, titles })
}

/// Mean rating per cuisine
pub async fn get_affinity(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<AffinityResponse> {
    let inner = state.inner.read().await;
    let affinity: BTreeMap<Cuisine, f64> = inner
        .users
        .get(&user_id)
        .map(|user| user.cuisine_affinity().into_iter().collect())
        .unwrap_or_default();

    Json(AffinityResponse { user_id, affinity })
}

/// Cuisines the user has not rated yet
pub async fn get_unrated_cuisines(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<UnratedCuisinesResponse> {
    let inner = state.inner.read().await;
    let cuisines = inner
        .users
        .get(&user_id)
        .map(|user| user.unrated_cuisines())
        .unwrap_or_else(|| Cuisine::SPECIFIC.to_vec());

    Json(UnratedCuisinesResponse { user_id, cuisines })
}

/// Summary of the user's trained model, if any
pub async fn get_model(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ModelResponse> {
    let inner = state.inner.read().await;
    let model = inner
        .users
        .get(&user_id)
        .and_then(|user| user.trained_model());

    Json(ModelResponse {
        trained: model.is_some(),
        rows: model.map(|m| m.rows()),
        estimators: model.map(|m| m.forest().len()),
        cuisines: model.map(|m| m.encoder().cuisines().to_vec()),
        trained_at: model.map(|m| m.trained_at()),
        user_id,
    })
}
