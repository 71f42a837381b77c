//! Axum router configuration for the NutriConnect API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{
    compute_targets, generate_metrics_plan, generate_recipe, generate_weekly_plan, get_profile,
    health, update_profile, update_weekly_plan, update_weight, NutritionAppState,
};

/// Create the authenticated API router.
///
/// # Routes
/// - `GET /profile` - Current user's profile
/// - `PUT /profile` - Create or partially update the profile
/// - `GET /nutrition` - Recompute and store daily targets
/// - `GET /nutrition/plan` - Generate a metrics plan and fold it into the targets
/// - `GET /nutrition/recipe` - Generate a recipe
/// - `POST /nutrition/update-weight` - Append to the weight log
/// - `GET /weekly-plan` - Generate and store weekly plans
/// - `POST /weekly-plan` - Merge edits into the stored weekly plans
pub fn api_routes() -> Router<NutritionAppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/nutrition", get(compute_targets))
        .route("/nutrition/plan", get(generate_metrics_plan))
        .route("/nutrition/recipe", get(generate_recipe))
        .route("/nutrition/update-weight", post(update_weight))
        .route(
            "/weekly-plan",
            get(generate_weekly_plan).post(update_weekly_plan),
        )
}

/// Create the complete application router.
///
/// `/api/*` runs behind the auth middleware; `/health` does not.
///
/// ```ignore
/// let app = nutrition_router(app_state, validator)
///     .layer(TraceLayer::new_for_http());
/// ```
pub fn nutrition_router(state: NutritionAppState, validator: AuthState) -> Router {
    let api = api_routes().route_layer(middleware::from_fn_with_state(validator, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}
