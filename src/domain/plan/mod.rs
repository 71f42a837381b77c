//! Plan module - reading untrusted generated plans, metrics and recipes.

mod document;
mod metrics;
mod normalizer;
mod recipe;

pub use document::{
    Exercise, Meal, NutritionDay, ShapeViolation, WeeklyPlanDocument, Weekday, WorkoutDay,
};
pub use metrics::MetricTargets;
pub use normalizer::{PlanNormalizer, PlanOutcome, METRIC_PREFIX, UNPARSED_PLAN_ERROR};
pub use recipe::{Recipe, RecipeOutcome};
