use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use larder_api::{
    api::{create_router, AppState},
    config::EngineSettings,
    error::{AppError, AppResult},
    models::{Cuisine, RecipeCandidate, RecipeDetails, RecipeId},
    services::providers::{BackupCatalogProvider, RecipeProvider},
};

/// In-memory provider with a fixed chicken-themed search result
#[derive(Default)]
struct FakeProvider {
    detail_fetches: AtomicUsize,
    empty: bool,
    /// Searches that fail before the provider recovers
    failing_searches: AtomicUsize,
}

fn candidate(id: u64, title: &str, missing: &[&str]) -> RecipeCandidate {
    RecipeCandidate {
        id: RecipeId(id),
        title: title.to_string(),
        missing_ingredients: missing.iter().map(|s| s.to_string()).collect(),
    }
}

#[async_trait::async_trait]
impl RecipeProvider for FakeProvider {
    async fn search_recipes(&self, _ingredients: &[String]) -> AppResult<Vec<RecipeCandidate>> {
        let failed = self
            .failing_searches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(AppError::ExternalApi("quota exhausted".to_string()));
        }
        if self.empty {
            return Ok(vec![]);
        }
        Ok(vec![
            candidate(1, "Spicy Chicken Tacos", &[]),
            candidate(2, "Mild Butter Chicken", &["cream"]),
            candidate(3, "Chicken Caesar Salad", &["croutons", "parmesan"]),
            candidate(4, "What goes with chicken?", &[]),
            candidate(5, "Chicken Cordon Bleu", &["ham", "gruyere", "breadcrumbs"]),
        ])
    }

    async fn fetch_recipe_details(&self, id: RecipeId) -> AppResult<RecipeDetails> {
        self.detail_fetches.fetch_add(1, Ordering::SeqCst);
        let details = match id.0 {
            1 => RecipeDetails {
                cuisines: vec!["Mexican".to_string()],
                spiciness: Some(5.0),
                ..RecipeDetails::default()
            },
            2 => RecipeDetails {
                cuisines: vec!["Indian".to_string()],
                spiciness: Some(1.0),
                ..RecipeDetails::default()
            },
            _ => RecipeDetails::default(),
        };
        Ok(details)
    }

    async fn classify_cuisine(&self, _title: &str) -> AppResult<Option<Cuisine>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn create_app(provider: Arc<FakeProvider>, backup: Option<Arc<dyn RecipeProvider>>) -> Router {
    let state = AppState::new(provider, backup, EngineSettings::default());
    create_router(state)
}

fn default_app() -> (Router, Arc<FakeProvider>) {
    let provider = Arc::new(FakeProvider::default());
    (create_app(provider.clone(), None), provider)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn titles(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = default_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_empty_inventory_is_reported() {
    let (app, provider) = default_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "ingredients": ["  ", ""] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "empty_inventory");
    assert_eq!(body["recommendations"], json!([]));
    assert_eq!(provider.detail_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_candidates_is_reported() {
    let provider = Arc::new(FakeProvider {
        empty: true,
        ..FakeProvider::default()
    });
    let app = create_app(provider, None);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "ingredients": ["chicken"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no_candidates");
}

#[tokio::test]
async fn test_anonymous_recommendations_are_filtered_and_capped() {
    let (app, _) = default_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "ingredients": ["chicken"], "top_n": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let mut returned = titles(&body);
    returned.sort();
    assert_eq!(
        returned,
        vec!["Chicken Caesar Salad", "Mild Butter Chicken", "Spicy Chicken Tacos"]
    );

    for recommendation in body["recommendations"].as_array().unwrap() {
        let score = recommendation["score"].as_f64().unwrap();
        assert!((3.0..=5.0).contains(&score));
        assert!(recommendation["link"]
            .as_str()
            .unwrap()
            .starts_with("https://spoonacular.com/recipes/"));
    }
}

#[tokio::test]
async fn test_profiles_are_reused_across_requests() {
    let (app, provider) = default_app();
    let request = json!({ "ingredients": ["chicken"] });

    send(&app, Method::POST, "/api/v1/recommendations", Some(request.clone())).await;
    assert_eq!(provider.detail_fetches.load(Ordering::SeqCst), 3);

    send(&app, Method::POST, "/api/v1/recommendations", Some(request)).await;
    assert_eq!(provider.detail_fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_preferences_shape_ranking() {
    let (app, _) = default_app();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/users/ana/preferences",
        Some(json!({ "Spicy": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "user_id": "ana", "ingredients": ["chicken"], "top_n": 2 })),
    )
    .await;

    assert_eq!(
        titles(&body),
        vec!["Spicy Chicken Tacos", "Chicken Caesar Salad"]
    );
    assert_eq!(body["recommendations"][0]["score"], 5.0);
    assert_eq!(body["recommendations"][0]["cuisine"], "Mexican");
}

#[tokio::test]
async fn test_rating_flow_trains_model_and_hides_low_rated() {
    let (app, _) = default_app();
    let recommend = json!({ "user_id": "ana", "ingredients": ["chicken"], "top_n": 10 });
    send(&app, Method::POST, "/api/v1/recommendations", Some(recommend.clone())).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/ana/ratings",
        Some(json!({ "title": "Spicy Chicken Tacos", "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["cuisine"], "Mexican");
    assert_eq!(body["model_trained"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/ana/ratings",
        Some(json!({ "title": "Mild Butter Chicken", "rating": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["low_rated"], true);
    assert_eq!(body["model_trained"], true);

    let (_, model) = send(&app, Method::GET, "/api/v1/users/ana/model", None).await;
    assert_eq!(model["trained"], true);
    assert_eq!(model["rows"], 2);
    assert_eq!(model["estimators"], 100);
    assert_eq!(model["cuisines"].as_array().unwrap().len(), 7);

    let (_, low_rated) = send(&app, Method::GET, "/api/v1/users/ana/low-rated", None).await;
    assert_eq!(low_rated["titles"], json!(["Mild Butter Chicken"]));

    let (_, body) = send(&app, Method::POST, "/api/v1/recommendations", Some(recommend)).await;
    let returned = titles(&body);
    assert_eq!(returned.len(), 2);
    assert!(!returned.contains(&"Mild Butter Chicken".to_string()));

    let (_, affinity) = send(&app, Method::GET, "/api/v1/users/ana/affinity", None).await;
    assert_eq!(affinity["affinity"]["Mexican"], 5.0);
    assert_eq!(affinity["affinity"]["Indian"], 2.0);

    let (_, unrated) = send(&app, Method::GET, "/api/v1/users/ana/unrated-cuisines", None).await;
    let cuisines = unrated["cuisines"].as_array().unwrap();
    assert_eq!(cuisines.len(), 4);
    assert!(!cuisines.contains(&json!("Mexican")));

    let (_, history) = send(&app, Method::GET, "/api/v1/users/ana/ratings", None).await;
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rating_validation() {
    let (app, _) = default_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/ana/ratings",
        Some(json!({ "title": "Toast", "rating": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("between 1 and 5"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/users/ana/ratings",
        Some(json!({ "title": "Toast", "cuisine": "Martian", "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, history) = send(&app, Method::GET, "/api/v1/users/ana/ratings", None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_unknown_title_defaults_to_international() {
    let (app, _) = default_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/ana/ratings",
        Some(json!({ "title": "Grandma's Stew", "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["cuisine"], "International");
}

#[test]
fn test_preferences_update_and_reset() {
    tokio_test::block_on(async {
        let (app, _) = default_app();

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/users/bo/preferences",
            Some(json!({ "Sweet": 5, "Sour": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, "/api/v1/users/bo/preferences", None).await;
        assert_eq!(body["preferences"]["Sweet"], 3);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/users/bo/preferences",
            Some(json!({ "Sweet": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["preferences"]["Sweet"], 5);

        let (_, body) = send(&app, Method::DELETE, "/api/v1/users/bo/preferences", None).await;
        assert_eq!(body["preferences"]["Sweet"], 3);
    });
}

#[tokio::test]
async fn test_search_failure_without_backup_is_unavailable() {
    let provider = Arc::new(FakeProvider {
        failing_searches: AtomicUsize::new(usize::MAX),
        ..FakeProvider::default()
    });
    let app = create_app(provider, None);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "ingredients": ["chicken"] })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_search_failure_falls_back_to_backup_catalog() {
    let provider = Arc::new(FakeProvider {
        failing_searches: AtomicUsize::new(usize::MAX),
        ..FakeProvider::default()
    });
    let app = create_app(provider, Some(Arc::new(BackupCatalogProvider::new())));
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({
            "ingredients": ["chicken", "tortillas", "cheese", "vegetables"],
            "diverse": true
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // Mexican dishes dominate the matches, but each cuisine shows up once first
    let mut cuisines: Vec<String> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["cuisine"].as_str().unwrap().to_string())
        .collect();
    cuisines.sort();
    assert_eq!(cuisines, vec!["Asian", "Indian", "Mexican"]);
}

#[tokio::test]
async fn test_backup_ids_do_not_shadow_primary_recipes() {
    let provider = Arc::new(FakeProvider {
        failing_searches: AtomicUsize::new(1),
        ..FakeProvider::default()
    });
    let app = create_app(provider, Some(Arc::new(BackupCatalogProvider::new())));

    // Served by the backup catalog, where id 1 is "Simple Pasta"
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "ingredients": ["pasta", "tomato sauce"], "top_n": 10 })),
    )
    .await;
    assert!(titles(&body).contains(&"Simple Pasta".to_string()));

    // The primary has recovered and reuses id 1 for a different dish
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "ingredients": ["chicken"], "top_n": 10 })),
    )
    .await;
    let mut returned = titles(&body);
    returned.sort();
    assert_eq!(
        returned,
        vec!["Chicken Caesar Salad", "Mild Butter Chicken", "Spicy Chicken Tacos"]
    );

    let tacos = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["title"] == "Spicy Chicken Tacos")
        .unwrap();
    assert_eq!(tacos["cuisine"], "Mexican");
    assert!(tacos["link"].as_str().unwrap().ends_with("/spicy-chicken-tacos-1"));
}

#[tokio::test]
async fn test_all_candidates_low_rated_reports_no_candidates() {
    let (app, _) = default_app();
    for title in ["Spicy Chicken Tacos", "Mild Butter Chicken", "Chicken Caesar Salad"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/users/cy/ratings",
            Some(json!({ "title": title, "rating": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({ "user_id": "cy", "ingredients": ["chicken"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no_candidates");
    assert_eq!(body["recommendations"], json!([]));
}

#[tokio::test]
async fn test_request_id_header_is_returned() {
    let (app, _) = default_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "weekly-shop")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "weekly-shop");
}
