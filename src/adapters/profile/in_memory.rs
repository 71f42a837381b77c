//! In-memory profile repository.
//!
//! Used when no database is configured and throughout the test suite.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::nutrition::{NutritionTargets, Profile, WeightEntry};
use crate::ports::ProfileRepository;

/// Stores profiles in a map keyed by user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

fn not_found(user_id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::ProfileNotFound, "Profile not found")
        .with_detail("user_id", user_id.as_str())
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.user_id) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "Profile already exists",
            ));
        }
        profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        let stored = profiles
            .get_mut(&profile.user_id)
            .ok_or_else(|| not_found(&profile.user_id))?;

        // The history only grows through append_weight.
        let weight_log = std::mem::take(&mut stored.weight_log);
        *stored = profile.clone();
        stored.weight_log = weight_log;
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn append_weight(
        &self,
        user_id: &UserId,
        entry: &WeightEntry,
    ) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        let stored = profiles.get_mut(user_id).ok_or_else(|| not_found(user_id))?;

        stored.weight_kg = entry.weight_kg;
        stored.updated_at = entry.recorded_at;
        stored.weight_log.push(entry.clone());
        Ok(())
    }

    async fn save_targets(
        &self,
        user_id: &UserId,
        targets: &NutritionTargets,
    ) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        let stored = profiles.get_mut(user_id).ok_or_else(|| not_found(user_id))?;
        stored.set_targets(*targets);
        Ok(())
    }

    async fn save_weekly_plans(
        &self,
        user_id: &UserId,
        nutrition_plan: &Value,
        workout_plan: &Value,
    ) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        let stored = profiles.get_mut(user_id).ok_or_else(|| not_found(user_id))?;
        stored.replace_weekly_plans(nutrition_plan.clone(), workout_plan.clone());
        Ok(())
    }
}
