//! GenerateRecipeHandler - one recipe matching the user's meal preference.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::plan::{PlanNormalizer, RecipeOutcome};
use crate::domain::prompts::recipe_prompt;
use crate::ports::{AIProvider, GenerationPurpose, ProfileRepository};

use super::super::generation::{generate, GenerationSettings};
use super::super::load_profile;

#[derive(Debug, Clone)]
pub struct GenerateRecipeCommand {
    pub user_id: UserId,
}

pub struct GenerateRecipeHandler {
    repository: Arc<dyn ProfileRepository>,
    ai_provider: Arc<dyn AIProvider>,
    settings: GenerationSettings,
}

impl GenerateRecipeHandler {
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

    /// Nothing is stored; an unreadable recipe comes back as a fallback.
    pub async fn handle(&self, cmd: GenerateRecipeCommand) -> Result<RecipeOutcome, DomainError> {
        let profile = load_profile(self.repository.as_ref(), &cmd.user_id).await?;

        let text = generate(
            self.ai_provider.as_ref(),
            &self.settings,
            &cmd.user_id,
            GenerationPurpose::Recipe,
            recipe_prompt(&profile),
        )
        .await?;

        Ok(PlanNormalizer::normalize_recipe(&text))
    }
}
