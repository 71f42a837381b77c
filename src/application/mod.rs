//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    ComputeTargetsCommand, ComputeTargetsHandler, GenerateMetricsPlanCommand,
    GenerateMetricsPlanHandler, GenerateMetricsPlanResult, GenerateRecipeCommand,
    GenerateRecipeHandler, GenerateWeeklyPlanCommand, GenerateWeeklyPlanHandler,
    GenerateWeeklyPlanResult, GenerationSettings, GetProfileHandler, GetProfileQuery,
    LogWeightCommand, LogWeightHandler, LogWeightResult, UpdateProfileCommand,
    UpdateProfileHandler, UpdateProfileResult, UpdateWeeklyPlanCommand, UpdateWeeklyPlanHandler,
    UpdateWeeklyPlanResult,
};
