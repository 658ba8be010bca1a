use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::session::{AuthSession, GuestState};

/// Shared session store. Authenticated sessions are written by the user
/// service and only read here; guest checkout state is owned by this
/// service.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_auth_session(&self, session_id: &str) -> AppResult<Option<AuthSession>>;
    async fn find_guest_state(&self, session_id: &str) -> AppResult<Option<GuestState>>;
    async fn save_guest_state(&self, session_id: &str, state: &GuestState) -> AppResult<()>;
    async fn delete_guest_state(&self, session_id: &str) -> AppResult<()>;
}
