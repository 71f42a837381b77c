//! ProfileRepository port for profile persistence operations

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    foundation::{DomainError, UserId},
    nutrition::{NutritionTargets, Profile, WeightEntry},
};

/// Repository for nutrition profiles, one per user.
///
/// The weight log is append-only: `update` never rewrites it, and
/// `append_weight` must set the current weight and add the entry in a single
/// transaction. `save_targets` and `save_weekly_plans` write only their own
/// columns, so a weight logged while a plan is being generated survives.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create a new profile
    async fn create(&self, profile: &Profile) -> Result<(), DomainError>;

    /// Update an existing profile's fields, targets and weekly plans
    async fn update(&self, profile: &Profile) -> Result<(), DomainError>;

    /// Find profile by user ID
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError>;

    /// Record a new current weight and append it to the history
    ///
    /// Fails with `ProfileNotFound` when the user has no profile.
    async fn append_weight(&self, user_id: &UserId, entry: &WeightEntry)
        -> Result<(), DomainError>;

    /// Replace the daily targets, leaving every other field as stored
    async fn save_targets(
        &self,
        user_id: &UserId,
        targets: &NutritionTargets,
    ) -> Result<(), DomainError>;

    /// Replace both weekly plans, leaving every other field as stored
    async fn save_weekly_plans(
        &self,
        user_id: &UserId,
        nutrition_plan: &Value,
        workout_plan: &Value,
    ) -> Result<(), DomainError>;
}
