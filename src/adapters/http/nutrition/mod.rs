//! HTTP adapter for the NutriConnect API:
//! - `GET /health` - Liveness check
//! - `GET /api/profile`, `PUT /api/profile` - Read and write the profile
//! - `GET /api/nutrition` - Daily targets
//! - `GET /api/nutrition/plan` - Generated metrics plan
//! - `GET /api/nutrition/recipe` - Generated recipe
//! - `POST /api/nutrition/update-weight` - Weight log
//! - `GET /api/weekly-plan`, `POST /api/weekly-plan` - Weekly plans

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{ApiError, NutritionAppState};
pub use routes::{api_routes, nutrition_router};
