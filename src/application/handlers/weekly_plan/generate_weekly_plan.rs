//! GenerateWeeklyPlanHandler - generates, normalizes and stores both weekly plans.
//!
//! Whatever the normalizer returns is stored, fallback documents included, so
//! the user can still read a plan the generator failed to structure.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::plan::{PlanNormalizer, PlanOutcome, ShapeViolation};
use crate::domain::prompts::weekly_plan_prompt;
use crate::ports::{AIProvider, GenerationPurpose, ProfileRepository};

use super::super::generation::{generate, GenerationSettings};
use super::super::load_profile;

#[derive(Debug, Clone)]
pub struct GenerateWeeklyPlanCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateWeeklyPlanResult {
    pub outcome: PlanOutcome,
    /// Deviations from the canonical day/meal/exercise shape. Informational.
    pub shape_violations: Vec<ShapeViolation>,
}

pub struct GenerateWeeklyPlanHandler {
    repository: Arc<dyn ProfileRepository>,
    ai_provider: Arc<dyn AIProvider>,
    settings: GenerationSettings,
}

impl GenerateWeeklyPlanHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>, ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            repository,
            ai_provider,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn handle(
        &self,
        cmd: GenerateWeeklyPlanCommand,
    ) -> Result<GenerateWeeklyPlanResult, DomainError> {
        let profile = load_profile(self.repository.as_ref(), &cmd.user_id).await?;

        let text = generate(
            self.ai_provider.as_ref(),
            &self.settings,
            &cmd.user_id,
            GenerationPurpose::WeeklyPlan,
            weekly_plan_prompt(&profile),
        )
        .await?;

        let outcome = PlanNormalizer::normalize(&text);
        let shape_violations = match &outcome {
            PlanOutcome::Structured(doc) => doc.shape_violations(),
            PlanOutcome::Fallback { .. } => Vec::new(),
        };

        self.repository
            .save_weekly_plans(&cmd.user_id, &outcome.nutrition_plan(), &outcome.workout_plan())
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            structured = outcome.is_structured(),
            violations = shape_violations.len(),
            "Weekly plans stored"
        );
        Ok(GenerateWeeklyPlanResult {
            outcome,
            shape_violations,
        })
    }
}
