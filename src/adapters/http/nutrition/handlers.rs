//! HTTP handlers for the profile, nutrition and weekly plan endpoints.
//!
//! These handlers connect axum routes to the application handlers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, FromRequest, Json, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    ComputeTargetsCommand, ComputeTargetsHandler, GenerateMetricsPlanCommand,
    GenerateMetricsPlanHandler, GenerateRecipeCommand, GenerateRecipeHandler,
    GenerateWeeklyPlanCommand, GenerateWeeklyPlanHandler, GenerationSettings, GetProfileHandler,
    GetProfileQuery, LogWeightCommand, LogWeightHandler, UpdateProfileCommand,
    UpdateProfileHandler, UpdateWeeklyPlanCommand, UpdateWeeklyPlanHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{AIProvider, ProfileRepository};

use super::dto::{
    ErrorResponse, HealthResponse, MetricsPlanResponse, NutritionTargetsResponse,
    ProfileRequest, ProfileResponse, RecipeResponse, TargetsResponse, UpdateWeeklyPlanRequest,
    UpdateWeightRequest, UpdateWeightResponse, WeeklyPlanResponse, WeightEntryResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct NutritionAppState {
    pub profile_repository: Arc<dyn ProfileRepository>,
    pub ai_provider: Arc<dyn AIProvider>,
    pub generation: GenerationSettings,
}

impl NutritionAppState {
    pub fn new(
        profile_repository: Arc<dyn ProfileRepository>,
        ai_provider: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            profile_repository,
            ai_provider,
            generation: GenerationSettings::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn get_profile_handler(&self) -> GetProfileHandler {
        GetProfileHandler::new(self.profile_repository.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(self.profile_repository.clone())
    }

    pub fn compute_targets_handler(&self) -> ComputeTargetsHandler {
        ComputeTargetsHandler::new(self.profile_repository.clone())
    }

    pub fn metrics_plan_handler(&self) -> GenerateMetricsPlanHandler {
        GenerateMetricsPlanHandler::new(self.profile_repository.clone(), self.ai_provider.clone())
            .with_settings(self.generation)
    }

    pub fn recipe_handler(&self) -> GenerateRecipeHandler {
        GenerateRecipeHandler::new(self.profile_repository.clone(), self.ai_provider.clone())
            .with_settings(self.generation)
    }

    pub fn log_weight_handler(&self) -> LogWeightHandler {
        LogWeightHandler::new(self.profile_repository.clone())
    }

    pub fn weekly_plan_handler(&self) -> GenerateWeeklyPlanHandler {
        GenerateWeeklyPlanHandler::new(self.profile_repository.clone(), self.ai_provider.clone())
            .with_settings(self.generation)
    }

    pub fn update_weekly_plan_handler(&self) -> UpdateWeeklyPlanHandler {
        UpdateWeeklyPlanHandler::new(self.profile_repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Profile
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/profile
pub async fn get_profile(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .get_profile_handler()
        .handle(GetProfileQuery { user_id: user.id })
        .await?;
    Ok(Json(profile.into()))
}

/// PUT /api/profile - creates the profile on first write
pub async fn update_profile(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let result = state
        .update_profile_handler()
        .handle(UpdateProfileCommand {
            user_id: user.id,
            changes: req.into(),
        })
        .await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ProfileResponse::from(result.profile))).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Nutrition
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/nutrition - recompute and store targets
pub async fn compute_targets(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<NutritionTargetsResponse>, ApiError> {
    let calculation = state
        .compute_targets_handler()
        .handle(ComputeTargetsCommand { user_id: user.id })
        .await?;

    Ok(Json(NutritionTargetsResponse {
        targets: calculation.targets.into(),
        warnings: calculation.warnings,
    }))
}

/// GET /api/nutrition/plan - generated metrics folded into the targets
pub async fn generate_metrics_plan(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MetricsPlanResponse>, ApiError> {
    let result = state
        .metrics_plan_handler()
        .handle(GenerateMetricsPlanCommand { user_id: user.id })
        .await?;

    Ok(Json(MetricsPlanResponse {
        nutrition_plan: result.metrics,
        targets: result.targets.map(TargetsResponse::from),
        message: "Nutrition and exercise plan generated successfully.".to_string(),
    }))
}

/// GET /api/nutrition/recipe
pub async fn generate_recipe(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = state
        .recipe_handler()
        .handle(GenerateRecipeCommand { user_id: user.id })
        .await?;

    Ok(Json(RecipeResponse {
        recipe,
        message: "Recipe generated successfully.".to_string(),
    }))
}

/// POST /api/nutrition/update-weight
pub async fn update_weight(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
    WeightBody(req): WeightBody,
) -> Result<Json<UpdateWeightResponse>, ApiError> {
    let weight_kg = req.weight_kg()?;

    let result = state
        .log_weight_handler()
        .handle(LogWeightCommand {
            user_id: user.id,
            weight_kg,
        })
        .await?;

    Ok(Json(UpdateWeightResponse {
        message: "Weight updated successfully".to_string(),
        current_weight: result.current_weight_kg,
        progress: result.weight_log.iter().map(WeightEntryResponse::from).collect(),
    }))
}

/// Update-weight body, accepted as JSON or as an HTML form post.
pub struct WeightBody(pub UpdateWeightRequest);

#[async_trait]
impl<S> FromRequest<S> for WeightBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| {
                content_type.starts_with("application/x-www-form-urlencoded")
            });

        if is_form {
            let Form(body) = Form::<UpdateWeightRequest>::from_request(req, state).await?;
            Ok(Self(body))
        } else {
            let Json(body) = Json::<UpdateWeightRequest>::from_request(req, state).await?;
            Ok(Self(body))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Weekly plans
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/weekly-plan - generate, normalize and store
pub async fn generate_weekly_plan(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<WeeklyPlanResponse>, ApiError> {
    let result = state
        .weekly_plan_handler()
        .handle(GenerateWeeklyPlanCommand { user_id: user.id })
        .await?;

    let structured = result.outcome.is_structured();
    let message = if structured {
        "Weekly plans generated successfully"
    } else {
        "Weekly plans generated, but the response could not be structured"
    };

    Ok(Json(WeeklyPlanResponse {
        weekly_nutrition_plan: result.outcome.nutrition_plan(),
        weekly_workout_plan: result.outcome.workout_plan(),
        message: message.to_string(),
        structured: Some(structured),
        warnings: result.shape_violations.iter().map(ToString::to_string).collect(),
    }))
}

/// POST /api/weekly-plan - merge edits key-by-key
pub async fn update_weekly_plan(
    State(state): State<NutritionAppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<UpdateWeeklyPlanRequest>, JsonRejection>,
) -> Result<Json<WeeklyPlanResponse>, ApiError> {
    let Json(req) = body?;
    let result = state
        .update_weekly_plan_handler()
        .handle(UpdateWeeklyPlanCommand {
            user_id: user.id,
            nutrition_plan: req.nutrition_plan,
            workout_plan: req.workout_plan,
        })
        .await?;

    Ok(Json(WeeklyPlanResponse {
        weekly_nutrition_plan: result.weekly_nutrition_plan,
        weekly_workout_plan: result.weekly_workout_plan,
        message: "Weekly plans updated successfully".to_string(),
        structured: None,
        warnings: Vec::new(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts domain errors into HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(DomainError::new(
            ErrorCode::ValidationFailed,
            format!("Invalid request body: {}", rejection.body_text()),
        ))
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError(DomainError::new(
            ErrorCode::ValidationFailed,
            format!("Invalid form body: {}", rejection.body_text()),
        ))
    }
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidProfile => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ProfileNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::ExternalServiceFailure => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.code);

        let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(code = %self.0.code, error = %self.0.message, "Request failed");
            "An unexpected error occurred".to_string()
        } else {
            self.0.message
        };

        let body = ErrorResponse::new(self.0.code.to_string(), message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_map_to_statuses() {
        assert_eq!(status_for(ErrorCode::InvalidProfile), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorCode::ValidationFailed), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::ProfileNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::ExternalServiceFailure), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorCode::DatabaseError), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let response =
            ApiError(DomainError::database("connection refused at 10.0.0.3")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "DATABASE_ERROR");
        assert!(!json["error"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn external_failure_message_is_user_visible() {
        let response = ApiError(DomainError::new(
            ErrorCode::ExternalServiceFailure,
            "Plan generation service failed: timeout",
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Plan generation service failed: timeout");
    }
}
