use serde::{Deserialize, Serialize};

use crate::model::{id::UserId, role::Role};

/// Profile record owned by the user service; only read and patched over
/// HTTP, never persisted by this service.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub login: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub trust_level: i32,
    #[serde(default)]
    pub consecutive_cancellations: i32,
}

/// Partial update sent to the user service; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consecutive_cancellations: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.trust_level.is_none()
            && self.consecutive_cancellations.is_none()
            && self.phone_number.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_serializes_only_changed_fields() {
        let patch = ProfilePatch {
            consecutive_cancellations: Some(0),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "consecutive_cancellations": 0 })
        );
    }

    #[test]
    fn profile_tolerates_missing_gamification_fields() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "login": "olena"
        }))
        .unwrap();
        assert_eq!(profile.trust_level, 0);
        assert_eq!(profile.consecutive_cancellations, 0);
        assert_eq!(profile.role, Role::User);
    }
}
