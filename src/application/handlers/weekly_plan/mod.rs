//! Weekly plan handlers.

mod generate_weekly_plan;
mod update_weekly_plan;

pub use generate_weekly_plan::{
    GenerateWeeklyPlanCommand, GenerateWeeklyPlanHandler, GenerateWeeklyPlanResult,
};
pub use update_weekly_plan::{
    UpdateWeeklyPlanCommand, UpdateWeeklyPlanHandler, UpdateWeeklyPlanResult,
};
