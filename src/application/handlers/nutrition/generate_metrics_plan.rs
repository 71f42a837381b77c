//! GenerateMetricsPlanHandler - asks the generator for daily targets as
//! tagged metric lines and folds any numbers it finds into the stored targets.
//!
//! Macros the generator leaves out come from the stored targets, or from the
//! calculator when none are stored yet.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::nutrition::{NutritionCalculator, NutritionTargets};
use crate::domain::plan::{MetricTargets, PlanNormalizer};
use crate::domain::prompts::metrics_plan_prompt;
use crate::ports::{AIProvider, GenerationPurpose, ProfileRepository};

use super::super::generation::{generate, GenerationSettings};
use super::super::load_profile;

#[derive(Debug, Clone)]
pub struct GenerateMetricsPlanCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateMetricsPlanResult {
    /// Every metric line found, keyed by lowercase name.
    pub metrics: BTreeMap<String, String>,
    /// Stored targets after the update.
    pub targets: Option<NutritionTargets>,
}

pub struct GenerateMetricsPlanHandler {
    repository: Arc<dyn ProfileRepository>,
    ai_provider: Arc<dyn AIProvider>,
    settings: GenerationSettings,
}

impl GenerateMetricsPlanHandler {
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
        cmd: GenerateMetricsPlanCommand,
    ) -> Result<GenerateMetricsPlanResult, DomainError> {
        let profile = load_profile(self.repository.as_ref(), &cmd.user_id).await?;

        let text = generate(
            self.ai_provider.as_ref(),
            &self.settings,
            &cmd.user_id,
            GenerationPurpose::MetricsPlan,
            metrics_plan_prompt(&profile),
        )
        .await?;

        let metrics = PlanNormalizer::parse_metrics(&text);
        let found = MetricTargets::from_metrics(&metrics);

        if found.is_empty() {
            tracing::warn!(
                user_id = %cmd.user_id,
                metric_count = metrics.len(),
                "No numeric targets in generated metrics; stored targets kept"
            );
            return Ok(GenerateMetricsPlanResult {
                metrics,
                targets: profile.targets,
            });
        }

        let base = match profile.targets {
            Some(stored) => stored,
            None => NutritionCalculator::calculate(&profile.body_metrics())?.targets,
        };
        let targets = found.overlay(base);
        self.repository.save_targets(&cmd.user_id, &targets).await?;

        Ok(GenerateMetricsPlanResult {
            metrics,
            targets: Some(targets),
        })
    }
}
