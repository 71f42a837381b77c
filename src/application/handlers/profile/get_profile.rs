//! GetProfileHandler - Query handler for a user's profile.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::nutrition::Profile;
use crate::ports::ProfileRepository;

use super::super::load_profile;

/// Query for the caller's profile.
#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub user_id: UserId,
}

/// Handler for profile reads.
pub struct GetProfileHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl GetProfileHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<Profile, DomainError> {
        load_profile(self.repository.as_ref(), &query.user_id).await
    }
}
