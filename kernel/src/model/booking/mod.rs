use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{Display, EnumString};

use crate::model::id::{BookingId, PhysicalRoomId, RoomTypeId, UserId};

pub mod event;

/// Arrival must lie at least this far in the future when a booking is made.
pub const MIN_ARRIVAL_LEAD_MINUTES: i64 = 80;
/// A stay is at least one full day.
pub const MIN_STAY_SECONDS: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: BookingId,
    pub ordered_at: DateTime<Utc>,
    pub stay: StayWindow,
    pub booked_by: Option<UserId>,
    pub phone_number: String,
    pub status: BookingStatus,
    pub rooms: Vec<BookedRoom>,
}

impl Booking {
    /// A guest booking has no owning user yet; it is tracked via the
    /// client's session until claimed at login or registration.
    pub fn is_guest(&self) -> bool {
        self.booked_by.is_none()
    }
}

/// One concrete room held by a booking, denormalized with the room-type
/// data the confirmation views need.
#[derive(Debug, Clone)]
pub struct BookedRoom {
    pub physical_room_id: PhysicalRoomId,
    pub room_number: String,
    pub room_type_id: RoomTypeId,
    pub category: String,
    pub price_per_night: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Only live bookings hold their rooms; cancelled and completed stays
    /// never block availability.
    pub fn blocks_availability(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Transition table for the booking status machine. Re-applying the
    /// current status is accepted so that admin retries stay idempotent;
    /// terminal statuses cannot be left.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        if self == next {
            return true;
        }
        !self.is_terminal()
    }

    pub fn validate_transition(self, next: BookingStatus) -> AppResult<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::UnprocessableEntity(format!(
                "booking status cannot change from {self} to {next}"
            )))
        }
    }
}

/// Half-open `[arrival, departure)` interval of a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayWindow {
    pub arrival: DateTime<Utc>,
    pub departure: DateTime<Utc>,
}

impl StayWindow {
    pub fn new(arrival: DateTime<Utc>, departure: DateTime<Utc>) -> Self {
        Self { arrival, departure }
    }

    /// Structural rules that hold for every booking, new or edited: the
    /// window must be ordered and span at least 24 hours.
    pub fn validate(&self) -> AppResult<()> {
        if self.departure <= self.arrival {
            return Err(AppError::InvalidBookingWindow(
                "departure must come after arrival".into(),
            ));
        }
        if (self.departure - self.arrival).num_seconds() < MIN_STAY_SECONDS {
            return Err(AppError::InvalidBookingWindow(
                "the minimum stay is 24 hours".into(),
            ));
        }
        Ok(())
    }

    /// Creation-time rules: the arrival must additionally be at least 80
    /// minutes after `now`.
    pub fn validate_at(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.arrival < now + Duration::minutes(MIN_ARRIVAL_LEAD_MINUTES) {
            return Err(AppError::InvalidBookingWindow(format!(
                "arrival must be at least {MIN_ARRIVAL_LEAD_MINUTES} minutes from now"
            )));
        }
        self.validate()
    }

    /// Strict overlap on half-open intervals; windows that merely touch
    /// (one departure equals the other arrival) do not conflict.
    pub fn overlaps(&self, other: &StayWindow) -> bool {
        self.arrival < other.departure && self.departure > other.arrival
    }

    pub fn nights(&self) -> i64 {
        (self.departure - self.arrival).num_days().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    fn window(arrival: DateTime<Utc>, departure: DateTime<Utc>) -> StayWindow {
        StayWindow::new(arrival, departure)
    }

    #[test]
    fn arrival_79_minutes_ahead_is_rejected() {
        let arrival = now() + Duration::minutes(79);
        let res = window(arrival, arrival + Duration::days(2)).validate_at(now());
        assert!(matches!(res, Err(AppError::InvalidBookingWindow(_))));
    }

    #[test]
    fn arrival_81_minutes_ahead_with_24h_stay_is_accepted() {
        let arrival = now() + Duration::minutes(81);
        let res = window(arrival, arrival + Duration::hours(24)).validate_at(now());
        assert!(res.is_ok());
    }

    #[test]
    fn stay_of_exactly_86400_seconds_is_accepted() {
        let arrival = now() + Duration::minutes(90);
        let res = window(arrival, arrival + Duration::seconds(86_400)).validate_at(now());
        assert!(res.is_ok());
    }

    #[test]
    fn inverted_window_is_rejected_even_without_clock_rules() {
        let arrival = now() + Duration::days(3);
        let res = window(arrival, arrival - Duration::days(2)).validate();
        assert!(matches!(res, Err(AppError::InvalidBookingWindow(_))));
    }

    #[test]
    fn sub_24h_window_is_rejected_even_without_clock_rules() {
        let arrival = now() + Duration::days(3);
        let res = window(arrival, arrival + Duration::hours(23)).validate();
        assert!(matches!(res, Err(AppError::InvalidBookingWindow(_))));
        assert!(window(arrival, arrival + Duration::hours(24)).validate().is_ok());
    }

    #[test]
    fn stay_of_86399_seconds_is_rejected() {
        let arrival = now() + Duration::minutes(90);
        let res = window(arrival, arrival + Duration::seconds(86_399)).validate_at(now());
        assert!(matches!(res, Err(AppError::InvalidBookingWindow(_))));
    }

    #[test]
    fn overlapping_windows_conflict() {
        // rooms booked Jan 10-12; a request for Jan 11-13 must clash
        let existing = window(
            Utc.with_ymd_and_hms(2025, 1, 10, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 12, 14, 0, 0).unwrap(),
        );
        let requested = window(
            Utc.with_ymd_and_hms(2025, 1, 11, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 13, 14, 0, 0).unwrap(),
        );
        assert!(existing.overlaps(&requested));
        assert!(requested.overlaps(&existing));
    }

    #[test]
    fn touching_windows_do_not_conflict() {
        let first = window(
            Utc.with_ymd_and_hms(2025, 1, 10, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 12, 14, 0, 0).unwrap(),
        );
        let second = window(
            Utc.with_ymd_and_hms(2025, 1, 12, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 14, 14, 0, 0).unwrap(),
        );
        assert!(!first.overlaps(&second));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let parsed: BookingStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("no-show".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn terminal_statuses_cannot_be_left() {
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Pending));
        assert!(BookingStatus::Completed.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn live_statuses_may_move_anywhere() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn only_live_statuses_block_availability() {
        assert!(BookingStatus::Pending.blocks_availability());
        assert!(BookingStatus::Confirmed.blocks_availability());
        assert!(!BookingStatus::Completed.blocks_availability());
        assert!(!BookingStatus::Cancelled.blocks_availability());
    }
}
