use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    user::{ProfilePatch, UserProfile},
};

/// Client for the user service across the network boundary. Callers treat
/// failures after a committed booking mutation as soft: they log and move
/// on rather than roll back.
#[async_trait]
pub trait UserProfileService: Send + Sync {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;
    async fn update(&self, user_id: UserId, patch: &ProfilePatch) -> AppResult<()>;
}
