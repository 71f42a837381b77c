//! UpdateWeeklyPlanHandler - merges edits into the stored weekly plans.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::ProfileRepository;

use super::super::load_profile;

/// Each supplied plan must be a JSON object. Its top-level keys replace the
/// stored keys of the same name; other stored keys are kept.
#[derive(Debug, Clone)]
pub struct UpdateWeeklyPlanCommand {
    pub user_id: UserId,
    pub nutrition_plan: Option<Value>,
    pub workout_plan: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateWeeklyPlanResult {
    pub weekly_nutrition_plan: Value,
    pub weekly_workout_plan: Value,
}

pub struct UpdateWeeklyPlanHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl UpdateWeeklyPlanHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateWeeklyPlanCommand,
    ) -> Result<UpdateWeeklyPlanResult, DomainError> {
        let nutrition = as_object("nutrition_plan", cmd.nutrition_plan)?;
        let workout = as_object("workout_plan", cmd.workout_plan)?;

        let mut profile = load_profile(self.repository.as_ref(), &cmd.user_id).await?;

        if nutrition.is_some() || workout.is_some() {
            profile.merge_weekly_plans(nutrition, workout);
            self.repository
                .save_weekly_plans(
                    &cmd.user_id,
                    &profile.weekly_nutrition_plan,
                    &profile.weekly_workout_plan,
                )
                .await?;
            tracing::info!(user_id = %cmd.user_id, "Weekly plans merged");
        }

        Ok(UpdateWeeklyPlanResult {
            weekly_nutrition_plan: profile.weekly_nutrition_plan,
            weekly_workout_plan: profile.weekly_workout_plan,
        })
    }
}

fn as_object(field: &str, value: Option<Value>) -> Result<Option<Map<String, Value>>, DomainError> {
    match value {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(DomainError::validation(
            field,
            format!("{} must be a JSON object", field),
        )),
    }
}
