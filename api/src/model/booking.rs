use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

use kernel::model::{
    booking::{
        event::{BookingFilter, UpdateBooking},
        BookedRoom, Booking, BookingStatus, StayWindow,
    },
    id::{BookingId, PhysicalRoomId, UserId},
};
use shared::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(length(min = 1))]
    pub physical_room_ids: Vec<PhysicalRoomId>,
    #[garde(skip)]
    pub arrival_at: DateTime<Utc>,
    #[garde(skip)]
    pub departure_at: DateTime<Utc>,
    #[garde(length(min = 1, max = 20))]
    pub phone_number: String,
    #[garde(skip)]
    #[serde(default)]
    pub book_without_confirmation: bool,
    #[garde(skip)]
    #[serde(default)]
    pub save_phone: bool,
}

impl CreateBookingRequest {
    pub fn stay(&self) -> StayWindow {
        StayWindow::new(self.arrival_at, self.departure_at)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[garde(inner(length(min = 1, max = 20)))]
    pub phone_number: Option<String>,
    #[garde(skip)]
    pub arrival_at: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub departure_at: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub physical_room_ids: Option<Vec<PhysicalRoomId>>,
}

impl UpdateBookingRequest {
    pub fn into_event(self, booking_id: BookingId) -> Result<UpdateBooking, AppError> {
        let stay = match (self.arrival_at, self.departure_at) {
            (Some(arrival), Some(departure)) => {
                let stay = StayWindow::new(arrival, departure);
                stay.validate()?;
                Some(stay)
            }
            (None, None) => None,
            _ => {
                return Err(AppError::UnprocessableEntity(
                    "arrival and departure must be changed together".into(),
                ))
            }
        };
        Ok(UpdateBooking::new(
            booking_id,
            self.phone_number,
            stay,
            self.physical_room_ids,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilterQuery {
    pub status: Option<BookingStatus>,
    pub phone_number: Option<String>,
}

impl From<BookingFilterQuery> for BookingFilter {
    fn from(value: BookingFilterQuery) -> Self {
        let BookingFilterQuery {
            status,
            phone_number,
        } = value;
        Self {
            status,
            phone_number,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub physical_room_ids: Vec<PhysicalRoomId>,
    pub arrival_at: DateTime<Utc>,
    pub departure_at: DateTime<Utc>,
}

impl AvailabilityQuery {
    pub fn stay(&self) -> StayWindow {
        StayWindow::new(self.arrival_at, self.departure_at)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Body of the internal service-to-service owner reassignment call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBookingOwnerRequest {
    pub user_id: UserId,
    pub booking_ids: Vec<BookingId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedBookingsResponse {
    pub updated_count: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedBookingsResponse {
    pub linked_count: u64,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBookingResponse {
    pub booking_id: BookingId,
    pub status: BookingStatus,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdatedResponse {
    pub status: BookingStatus,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub ordered_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub departure_at: DateTime<Utc>,
    pub user_id: Option<UserId>,
    pub phone_number: String,
    pub status: BookingStatus,
    pub nights: i64,
    pub total_price: f64,
    pub rooms: Vec<BookedRoomResponse>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let nights = value.stay.nights();
        let price_per_night: f64 = value.rooms.iter().map(|r| r.price_per_night).sum();
        let Booking {
            booking_id,
            ordered_at,
            stay,
            booked_by,
            phone_number,
            status,
            rooms,
        } = value;
        Self {
            booking_id,
            ordered_at,
            arrival_at: stay.arrival,
            departure_at: stay.departure,
            user_id: booked_by,
            phone_number,
            status,
            nights,
            total_price: price_per_night * nights as f64,
            rooms: rooms.into_iter().map(BookedRoomResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRoomResponse {
    pub physical_room_id: PhysicalRoomId,
    pub room_number: String,
    pub category: String,
    pub price_per_night: f64,
}

impl From<BookedRoom> for BookedRoomResponse {
    fn from(value: BookedRoom) -> Self {
        let BookedRoom {
            physical_room_id,
            room_number,
            category,
            price_per_night,
            ..
        } = value;
        Self {
            physical_room_id,
            room_number,
            category,
            price_per_night,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_camel_case_payload() {
        let req: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "physicalRoomIds": ["7c9e6679-7425-40de-944b-e07fc1f90ae7"],
            "arrivalAt": "2025-06-01T14:00:00Z",
            "departureAt": "2025-06-03T11:00:00Z",
            "phoneNumber": "+380501112233"
        }))
        .unwrap();
        assert_eq!(req.physical_room_ids.len(), 1);
        assert!(!req.book_without_confirmation);
        assert!(req.validate(&()).is_ok());
    }

    #[test]
    fn create_request_rejects_empty_room_list() {
        let req: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "physicalRoomIds": [],
            "arrivalAt": "2025-06-01T14:00:00Z",
            "departureAt": "2025-06-03T11:00:00Z",
            "phoneNumber": "+380501112233"
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn update_request_requires_both_ends_of_the_window() {
        let req = UpdateBookingRequest {
            phone_number: None,
            arrival_at: Some("2025-06-01T14:00:00Z".parse().unwrap()),
            departure_at: None,
            physical_room_ids: None,
        };
        assert!(req.into_event(BookingId::new()).is_err());
    }

    #[test]
    fn update_request_rejects_an_inverted_window() {
        let req = UpdateBookingRequest {
            phone_number: None,
            arrival_at: Some("2025-06-03T14:00:00Z".parse().unwrap()),
            departure_at: Some("2025-06-01T11:00:00Z".parse().unwrap()),
            physical_room_ids: None,
        };
        let res = req.into_event(BookingId::new());
        assert!(matches!(res, Err(AppError::InvalidBookingWindow(_))));
    }

    #[test]
    fn update_request_rejects_a_stay_shorter_than_a_day() {
        let req = UpdateBookingRequest {
            phone_number: None,
            arrival_at: Some("2025-06-01T14:00:00Z".parse().unwrap()),
            departure_at: Some("2025-06-01T15:00:00Z".parse().unwrap()),
            physical_room_ids: None,
        };
        let res = req.into_event(BookingId::new());
        assert!(matches!(res, Err(AppError::InvalidBookingWindow(_))));
    }

    #[test]
    fn unknown_status_in_payload_is_rejected() {
        let res = serde_json::from_value::<UpdateBookingStatusRequest>(
            serde_json::json!({ "status": "no-show" }),
        );
        assert!(res.is_err());
    }
}
