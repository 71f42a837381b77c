//! Nutrition handlers: targets, generated metrics, recipes and the weight log.

mod compute_targets;
mod generate_metrics_plan;
mod generate_recipe;
mod log_weight;

pub use compute_targets::{ComputeTargetsCommand, ComputeTargetsHandler};
pub use generate_metrics_plan::{
    GenerateMetricsPlanCommand, GenerateMetricsPlanHandler, GenerateMetricsPlanResult,
};
pub use generate_recipe::{GenerateRecipeCommand, GenerateRecipeHandler};
pub use log_weight::{LogWeightCommand, LogWeightHandler, LogWeightResult};
