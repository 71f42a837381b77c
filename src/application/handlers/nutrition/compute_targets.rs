//! ComputeTargetsHandler - recomputes and stores daily targets.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::nutrition::{NutritionCalculator, TargetCalculation};
use crate::ports::ProfileRepository;

use super::super::load_profile;

#[derive(Debug, Clone)]
pub struct ComputeTargetsCommand {
    pub user_id: UserId,
}

/// Loads the profile, runs the calculator and overwrites the stored targets.
pub struct ComputeTargetsHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl ComputeTargetsHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: ComputeTargetsCommand,
    ) -> Result<TargetCalculation, DomainError> {
        let profile = load_profile(self.repository.as_ref(), &cmd.user_id).await?;

        let calculation = NutritionCalculator::calculate(&profile.body_metrics())?;
        self.repository
            .save_targets(&cmd.user_id, &calculation.targets)
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            daily_calories = calculation.targets.daily_calories,
            warnings = calculation.warnings.len(),
            "Nutrition targets computed"
        );
        Ok(calculation)
    }
}
