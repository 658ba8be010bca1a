use serde::{Deserialize, Serialize};

use crate::model::{id::BookingId, id::UserId, role::Role};

/// Authenticated-session record written to the shared session store by the
/// user service; this service only reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub user_id: UserId,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub trust_level: i32,
}

impl AuthSession {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Ephemeral per-client checkout state for bookings made without an
/// account, kept until the bookings are claimed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestState {
    #[serde(default)]
    pub guest_booking_ids: Vec<BookingId>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub booking_message: Option<String>,
}

impl GuestState {
    pub fn remember_booking(&mut self, booking_id: BookingId) {
        if !self.guest_booking_ids.contains(&booking_id) {
            self.guest_booking_ids.push(booking_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_booking_is_idempotent() {
        let id = BookingId::new();
        let mut state = GuestState::default();
        state.remember_booking(id);
        state.remember_booking(id);
        assert_eq!(state.guest_booking_ids, vec![id]);
    }

    #[test]
    fn auth_session_deserializes_from_store_payload() {
        let session: AuthSession = serde_json::from_str(
            r#"{"user_id":"7c9e6679-7425-40de-944b-e07fc1f90ae7","role":"admin","trust_level":2}"#,
        )
        .unwrap();
        assert!(session.is_admin());
        assert_eq!(session.trust_level, 2);
    }
}
