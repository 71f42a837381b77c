//! Application handlers.
//!
//! One command or query handler per operation. Handlers hold their ports as
//! `Arc<dyn Port>` and never talk to adapters directly.

mod generation;
pub mod nutrition;
pub mod profile;
pub mod weekly_plan;

pub use generation::GenerationSettings;
pub use nutrition::{
    ComputeTargetsCommand, ComputeTargetsHandler, GenerateMetricsPlanCommand,
    GenerateMetricsPlanHandler, GenerateMetricsPlanResult, GenerateRecipeCommand,
    GenerateRecipeHandler, LogWeightCommand, LogWeightHandler, LogWeightResult,
};
pub use profile::{
    GetProfileHandler, GetProfileQuery, UpdateProfileCommand, UpdateProfileHandler,
    UpdateProfileResult,
};
pub use weekly_plan::{
    GenerateWeeklyPlanCommand, GenerateWeeklyPlanHandler, GenerateWeeklyPlanResult,
    UpdateWeeklyPlanCommand, UpdateWeeklyPlanHandler, UpdateWeeklyPlanResult,
};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::nutrition::Profile;
use crate::ports::ProfileRepository;

/// Loads a profile or fails with `ProfileNotFound`.
pub(crate) async fn load_profile(
    repository: &dyn ProfileRepository,
    user_id: &UserId,
) -> Result<Profile, DomainError> {
    repository.find_by_user(user_id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::ProfileNotFound, "Profile not found")
            .with_detail("user_id", user_id.as_str())
    })
}
