use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;

use kernel::model::session::{AuthSession, GuestState};
use kernel::repository::session::SessionStore;
use shared::error::AppResult;

use crate::redis::RedisClient;

// written by the user service; read-only here
const AUTH_SESSION_PREFIX: &str = "session";
const GUEST_STATE_PREFIX: &str = "guest-state";

#[derive(new)]
pub struct SessionStoreImpl {
    kv: Arc<RedisClient>,
    guest_state_ttl: u64,
}

#[async_trait]
impl SessionStore for SessionStoreImpl {
    async fn find_auth_session(&self, session_id: &str) -> AppResult<Option<AuthSession>> {
        let raw = self
            .kv
            .get(&format!("{AUTH_SESSION_PREFIX}:{session_id}"))
            .await?;
        match raw {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    async fn find_guest_state(&self, session_id: &str) -> AppResult<Option<GuestState>> {
        let raw = self
            .kv
            .get(&format!("{GUEST_STATE_PREFIX}:{session_id}"))
            .await?;
        match raw {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    async fn save_guest_state(&self, session_id: &str, state: &GuestState) -> AppResult<()> {
        let raw = serde_json::to_string(state)?;
        self.kv
            .set_ex(
                &format!("{GUEST_STATE_PREFIX}:{session_id}"),
                &raw,
                self.guest_state_ttl,
            )
            .await
    }

    async fn delete_guest_state(&self, session_id: &str) -> AppResult<()> {
        self.kv
            .delete(&format!("{GUEST_STATE_PREFIX}:{session_id}"))
            .await
    }
}
