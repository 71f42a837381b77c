//! HTTP adapters - REST API implementations.

pub mod middleware;
pub mod nutrition;

pub use nutrition::{nutrition_router, NutritionAppState};
