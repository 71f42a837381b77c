//! End-to-end tests for the NutriConnect HTTP API.
//!
//! The router is wired the way `main` wires it, with real HS256 tokens, the
//! in-memory profile store and a scripted text generator.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use nutri_connect::adapters::ai::{MockAIProvider, MockError};
use nutri_connect::adapters::auth::{JwtConfig, JwtSessionValidator};
use nutri_connect::adapters::http::middleware::AuthState;
use nutri_connect::adapters::http::{nutrition_router, NutritionAppState};
use nutri_connect::adapters::profile::InMemoryProfileRepository;
use nutri_connect::domain::foundation::UserId;
use nutri_connect::ports::ProfileRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

const SECRET: &str = "integration-test-secret-of-sufficient-length";
const ISSUER: &str = "nutri-auth";

struct TestApp {
    router: Router,
    repository: InMemoryProfileRepository,
    provider: MockAIProvider,
}

impl TestApp {
    fn new(provider: MockAIProvider) -> Self {
        let repository = InMemoryProfileRepository::new();
        let state = NutritionAppState::new(Arc::new(repository.clone()), Arc::new(provider.clone()));
        let validator: AuthState = Arc::new(JwtSessionValidator::new(
            JwtConfig::new(SECRET).with_issuer(ISSUER),
        ));

        Self {
            router: nutrition_router(state, validator),
            repository,
            provider,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .header("Authorization", bearer("user-42"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Authorization", bearer("user-42"))
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn create_profile(&self) {
        let (status, _) = self
            .send_json(
                "PUT",
                "/api/profile",
                json!({
                    "gender": "M",
                    "age": 30,
                    "height": 175,
                    "weight": 70,
                    "target_weight": 65,
                    "activity_level": "moderate",
                    "timeline": "3 months",
                    "meal_preference": "vegetarian"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

fn token(subject: &str, issuer: &str, exp_offset_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
    encode(
        &Header::default(),
        &json!({"sub": subject, "iss": issuer, "exp": exp}),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer(subject: &str) -> String {
    format!("Bearer {}", token(subject, ISSUER, 3600))
}

const WEEKLY_PLAN: &str = r#"```json
{
  "nutrition_plan": {
    "monday": {
      "breakfast": {"meal": "Oatmeal with berries", "calories": 350, "protein": 12, "carbs": 60, "fat": 6},
      "lunch": {"meal": "Lentil salad", "calories": 550, "protein": 28, "carbs": 70, "fat": 14}
    },
    "tuesday": {
      "breakfast": {"meal": "Greek yogurt", "calories": 300, "protein": 20, "carbs": 30, "fat": 8}
    }
  },
  "workout_plan": {
    "monday": {"focus": "Cardio", "exercises": [{"name": "Run", "sets": 1, "reps": 1, "duration": "30 min"}]}
  }
}
```"#;

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn expired_and_foreign_tokens_are_rejected() {
    let app = TestApp::new(MockAIProvider::new());

    for token in [token("user-42", ISSUER, -3600), token("user-42", "someone-else", 3600)] {
        let (status, body) = app
            .send(
                Request::builder()
                    .uri("/api/profile")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

// =============================================================================
// Profile and targets
// =============================================================================

#[tokio::test]
async fn profile_then_targets_flow() {
    let app = TestApp::new(MockAIProvider::new());
    app.create_profile().await;

    let (status, body) = app.get("/api/nutrition").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daily_calories"], 2056.0);
    assert_eq!(body["protein_target"], 154.0);
    assert_eq!(body["fat_target"], 57.0);
    assert_eq!(body["carbs_target"], 231.0);

    let (status, profile) = app.get("/api/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["user_id"], "user-42");
    assert_eq!(profile["targets"]["daily_calories"], 2056.0);
    assert_eq!(profile["bmi"], 22.9);
}

#[tokio::test]
async fn impossible_profile_values_are_rejected() {
    let app = TestApp::new(MockAIProvider::new());
    app.create_profile().await;

    let (status, body) = app
        .send_json("PUT", "/api/profile", json!({"height_cm": -10}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn metrics_plan_overrides_only_reported_targets() {
    let app = TestApp::new(MockAIProvider::new().with_response(
        "Here is your plan.\nMETRIC:CALORIES:2,100 kcal\nMETRIC:PROTEIN:140\nMETRIC:EXERCISE:Mon: run",
    ));
    app.create_profile().await;
    app.get("/api/nutrition").await;

    let (status, body) = app.get("/api/nutrition/plan").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nutrition_plan"]["calories"], "2,100 kcal");
    assert!(body["nutrition_plan"].get("exercise").is_none());
    assert_eq!(body["targets"]["daily_calories"], 2100.0);
    assert_eq!(body["targets"]["protein_target"], 140.0);
    assert_eq!(body["targets"]["fat_target"], 57.0);

    let prompt = app.provider.last_prompt().unwrap();
    assert!(prompt.contains("METRIC:"));
}

#[tokio::test]
async fn recipe_falls_back_to_raw_text() {
    let app = TestApp::new(MockAIProvider::new().with_response("Just eat a big salad."));
    app.create_profile().await;

    let (status, body) = app.get("/api/nutrition/recipe").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipe"]["status"], "fallback");
    assert_eq!(body["recipe"]["raw_response"], "Just eat a big salad.");
}

#[tokio::test]
async fn generator_outage_is_bad_gateway() {
    let app = TestApp::new(MockAIProvider::new().with_error(MockError::Unavailable {
        message: "overloaded".to_string(),
    }));
    app.create_profile().await;

    let (status, body) = app.get("/api/weekly-plan").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "EXTERNAL_SERVICE_FAILURE");
}

#[tokio::test]
async fn weekly_plan_is_generated_then_edited() {
    let app = TestApp::new(MockAIProvider::new().with_response(WEEKLY_PLAN));
    app.create_profile().await;

    let (status, generated) = app.get("/api/weekly-plan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(generated["structured"], true);
    assert_eq!(
        generated["weekly_nutrition_plan"]["monday"]["breakfast"]["meal"],
        "Oatmeal with berries"
    );

    let (status, edited) = app
        .send_json(
            "POST",
            "/api/weekly-plan",
            json!({"nutrition_plan": {"monday": {"breakfast": {"meal": "Tofu scramble"}}}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        edited["weekly_nutrition_plan"]["monday"]["breakfast"]["meal"],
        "Tofu scramble"
    );
    assert_eq!(
        edited["weekly_nutrition_plan"]["tuesday"]["breakfast"]["meal"],
        "Greek yogurt"
    );
    assert_eq!(edited["weekly_workout_plan"]["monday"]["focus"], "Cardio");

    let stored = app
        .repository
        .find_by_user(&UserId::new("user-42").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.weekly_nutrition_plan["monday"]["breakfast"]["meal"],
        "Tofu scramble"
    );
}

// =============================================================================
// Weight tracking
// =============================================================================

#[tokio::test]
async fn weight_log_grows_in_order() {
    let app = TestApp::new(MockAIProvider::new());
    app.create_profile().await;

    for weight in [json!(69.4), json!("68.9")] {
        let (status, _) = app
            .send_json("POST", "/api/nutrition/update-weight", json!({"weight": weight}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app
        .send_json("POST", "/api/nutrition/update-weight", json!({"weight": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (_, profile) = app.get("/api/profile").await;
    let log = profile["weight_log"].as_array().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["weight"], 69.4);
    assert_eq!(log[1]["weight"], 68.9);
    assert_eq!(profile["weight_kg"], 68.9);
}
