use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use kernel::model::{id::UserId, session::AuthSession};
use registry::AppRegistry;
use shared::error::AppError;

/// Opaque session id issued by the user service; the shared store is
/// keyed by it for both auth sessions and guest checkout state.
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Any client with a session: guests carry the session id only, logged-in
/// users additionally resolve to an auth record from the session store.
pub struct ClientSession {
    pub session_id: SessionId,
    pub auth: Option<AuthSession>,
}

impl ClientSession {
    pub fn user(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }
}

/// A client whose session resolved to a logged-in user.
pub struct AuthorizedUser {
    pub session_id: SessionId,
    pub auth: AuthSession,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.auth.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.auth.is_admin()
    }
}

async fn extract_session_id(parts: &mut Parts) -> Result<SessionId, AppError> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::UnauthenticatedError)?;
    Ok(SessionId(bearer.token().to_string()))
}

#[async_trait]
impl FromRequestParts<AppRegistry> for ClientSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let session_id = extract_session_id(parts).await?;
        let auth = registry
            .session_store()
            .find_auth_session(session_id.as_str())
            .await?;
        Ok(Self { session_id, auth })
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let session = ClientSession::from_request_parts(parts, registry).await?;
        let auth = session.auth.ok_or(AppError::UnauthenticatedError)?;
        Ok(Self {
            session_id: session.session_id,
            auth,
        })
    }
}
