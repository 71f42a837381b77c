//! LogWeightHandler - records a new current weight.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::nutrition::WeightEntry;
use crate::ports::ProfileRepository;

use super::super::load_profile;

#[derive(Debug, Clone)]
pub struct LogWeightCommand {
    pub user_id: UserId,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogWeightResult {
    pub current_weight_kg: f64,
    /// Full history, oldest first, including the new entry.
    pub weight_log: Vec<WeightEntry>,
}

pub struct LogWeightHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl LogWeightHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: LogWeightCommand) -> Result<LogWeightResult, DomainError> {
        let mut profile = load_profile(self.repository.as_ref(), &cmd.user_id).await?;

        let entry = profile.record_weight(cmd.weight_kg, Timestamp::now())?.clone();
        self.repository.append_weight(&cmd.user_id, &entry).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            weight_kg = entry.weight_kg,
            entries = profile.weight_log.len(),
            "Weight logged"
        );
        Ok(LogWeightResult {
            current_weight_kg: profile.weight_kg,
            weight_log: profile.weight_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{seeded_repository, user_id};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn appends_entries_in_order() {
        let repo = seeded_repository().await;
        let handler = LogWeightHandler::new(repo.clone());

        handler
            .handle(LogWeightCommand {
                user_id: user_id(),
                weight_kg: 69.5,
            })
            .await
            .unwrap();
        let result = handler
            .handle(LogWeightCommand {
                user_id: user_id(),
                weight_kg: 69.0,
            })
            .await
            .unwrap();

        assert_eq!(result.current_weight_kg, 69.0);
        let weights: Vec<f64> = result.weight_log.iter().map(|e| e.weight_kg).collect();
        assert_eq!(weights, vec![69.5, 69.0]);
        assert!(!result.weight_log[1].recorded_at.is_before(&result.weight_log[0].recorded_at));

        let stored = repo.find_by_user(&user_id()).await.unwrap().unwrap();
        assert_eq!(stored.weight_kg, 69.0);
        assert_eq!(stored.weight_log, result.weight_log);
    }

    #[tokio::test]
    async fn rejects_non_positive_weight() {
        let repo = seeded_repository().await;
        let handler = LogWeightHandler::new(repo.clone());

        for weight in [0.0, -3.0, f64::NAN] {
            let err = handler
                .handle(LogWeightCommand {
                    user_id: user_id(),
                    weight_kg: weight,
                })
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
        }

        let stored = repo.find_by_user(&user_id()).await.unwrap().unwrap();
        assert!(stored.weight_log.is_empty());
        assert_eq!(stored.weight_kg, 70.0);
    }
}
