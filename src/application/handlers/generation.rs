//! Shared request building for handlers that call the text generator.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::prompts::SYSTEM_PROMPT;
use crate::ports::{
    AIProvider, CompletionRequest, GenerationPurpose, MessageRole, RequestMetadata,
};

/// Sampling knobs applied to every generation request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationSettings {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn request(
        &self,
        user_id: &UserId,
        purpose: GenerationPurpose,
        prompt: String,
    ) -> CompletionRequest {
        let mut request = CompletionRequest::new(RequestMetadata::new(user_id.clone(), purpose))
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }
}

/// Sends one prompt and returns the generated text.
pub(crate) async fn generate(
    provider: &dyn AIProvider,
    settings: &GenerationSettings,
    user_id: &UserId,
    purpose: GenerationPurpose,
    prompt: String,
) -> Result<String, DomainError> {
    tracing::info!(user_id = %user_id, purpose = %purpose, "Requesting generation");

    let response = provider
        .complete(settings.request(user_id, purpose, prompt))
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, purpose = %purpose, error = %e, "Generation failed");
            DomainError::from(e)
        })?;

    tracing::debug!(
        model = %response.model,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "Generation finished"
    );
    Ok(response.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn applies_settings_and_system_prompt() {
        let provider = MockAIProvider::new().with_response("ok");
        let settings = GenerationSettings::default()
            .with_temperature(0.3)
            .with_max_tokens(512);

        let text = generate(
            &provider,
            &settings,
            &UserId::new("user-1").unwrap(),
            GenerationPurpose::Recipe,
            "make soup".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(text, "ok");
        let call = &provider.get_calls()[0];
        assert_eq!(call.temperature, Some(0.3));
        assert_eq!(call.max_tokens, Some(512));
        assert_eq!(call.system_prompt.as_deref(), Some(SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn provider_failure_is_external_service_failure() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });

        let err = generate(
            &provider,
            &GenerationSettings::default(),
            &UserId::new("user-1").unwrap(),
            GenerationPurpose::WeeklyPlan,
            "plan".to_string(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ExternalServiceFailure);
    }
}
