//! UpdateProfileHandler - Command handler that creates or edits a profile.
//!
//! A first write creates the profile and needs the full set of body
//! measurements. Later writes only touch the supplied fields. Targets are
//! never recomputed here.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::nutrition::{Profile, ProfileChanges};
use crate::ports::ProfileRepository;

/// Command to create or partially update the caller's profile.
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub changes: ProfileChanges,
}

/// Result of a profile write.
#[derive(Debug, Clone)]
pub struct UpdateProfileResult {
    pub profile: Profile,
    /// True when this write created the profile.
    pub created: bool,
}

pub struct UpdateProfileHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl UpdateProfileHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateProfileCommand,
    ) -> Result<UpdateProfileResult, DomainError> {
        match self.repository.find_by_user(&cmd.user_id).await? {
            Some(mut profile) => {
                if cmd.changes.is_empty() {
                    return Ok(UpdateProfileResult {
                        profile,
                        created: false,
                    });
                }
                profile.apply(cmd.changes)?;
                self.repository.update(&profile).await?;

                tracing::info!(user_id = %cmd.user_id, "Profile updated");
                Ok(UpdateProfileResult {
                    profile,
                    created: false,
                })
            }
            None => {
                let profile = Profile::create(cmd.user_id.clone(), cmd.changes)?;
                self.repository.create(&profile).await?;

                tracing::info!(user_id = %cmd.user_id, "Profile created");
                Ok(UpdateProfileResult {
                    profile,
                    created: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::profile::InMemoryProfileRepository;
    use crate::application::handlers::test_support::{
        sample_changes, seeded_repository, user_id,
    };
    use crate::domain::foundation::ErrorCode;
    use crate::domain::nutrition::{ActivityLevel, NutritionTargets};

    #[tokio::test]
    async fn first_write_creates_profile() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let handler = UpdateProfileHandler::new(repo.clone());

        let result = handler
            .handle(UpdateProfileCommand {
                user_id: user_id(),
                changes: sample_changes(),
            })
            .await
            .unwrap();

        assert!(result.created);
        assert!(repo.find_by_user(&user_id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn first_write_without_measurements_fails() {
        let handler = UpdateProfileHandler::new(Arc::new(InMemoryProfileRepository::new()));

        let err = handler
            .handle(UpdateProfileCommand {
                user_id: user_id(),
                changes: ProfileChanges {
                    age: Some(30),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn partial_update_keeps_targets() {
        let repo = seeded_repository().await;
        let mut stored = repo.find_by_user(&user_id()).await.unwrap().unwrap();
        stored.set_targets(NutritionTargets {
            daily_calories: 2000.0,
            protein_target_g: 150.0,
            fat_target_g: 60.0,
            carbs_target_g: 200.0,
        });
        repo.update(&stored).await.unwrap();

        let handler = UpdateProfileHandler::new(repo.clone());
        let result = handler
            .handle(UpdateProfileCommand {
                user_id: user_id(),
                changes: ProfileChanges {
                    activity_level: Some(ActivityLevel::Active),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert!(!result.created);
        assert_eq!(result.profile.activity_level, ActivityLevel::Active);
        assert_eq!(result.profile.targets.unwrap().daily_calories, 2000.0);
    }

    #[tokio::test]
    async fn non_positive_height_is_rejected() {
        let repo = seeded_repository().await;
        let handler = UpdateProfileHandler::new(repo);

        let err = handler
            .handle(UpdateProfileCommand {
                user_id: user_id(),
                changes: ProfileChanges {
                    height_cm: Some(-1.0),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field").map(String::as_str), Some("height_cm"));
    }
}
