use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use kernel::model::{
    id::UserId,
    user::{ProfilePatch, UserProfile},
};
use kernel::repository::user_profile::UserProfileService;
use shared::{
    config::UserServiceConfig,
    error::{AppError, AppResult},
};

/// HTTP client for the user service. Every call is single-attempt; any
/// transport error or non-success status surfaces as
/// `AppError::ExternalServiceError` and the caller decides whether that
/// is fatal.
pub struct UserProfileServiceImpl {
    client: Client,
    base_url: String,
}

impl UserProfileServiceImpl {
    pub fn new(config: &UserServiceConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn user_url(&self, user_id: UserId) -> String {
        format!("{}/users/{}", self.base_url, user_id)
    }
}

#[async_trait]
impl UserProfileService for UserProfileServiceImpl {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let res = self
            .client
            .get(self.user_url(user_id))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("user service GET: {e}")))?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "user service responded with {}",
                res.status()
            )));
        }
        let profile = res
            .json::<UserProfile>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("user service body: {e}")))?;
        Ok(Some(profile))
    }

    async fn update(&self, user_id: UserId, patch: &ProfilePatch) -> AppResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let res = self
            .client
            .patch(self.user_url(user_id))
            .json(patch)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("user service PATCH: {e}")))?;
        if !res.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "user service responded with {}",
                res.status()
            )));
        }
        Ok(())
    }
}
