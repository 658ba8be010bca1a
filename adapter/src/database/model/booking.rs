use kernel::model::{
    booking::{BookedRoom, Booking, BookingStatus, StayWindow},
    id::{BookingId, PhysicalRoomId, RoomTypeId, UserId},
};
use shared::error::{AppError, AppResult};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: Uuid,
    pub ordered_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub departure_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub phone_number: String,
    pub status: String,
}

impl BookingRow {
    // the status column is free text at the SQL level; anything outside the
    // closed set is treated as data corruption
    pub fn parse_status(&self) -> AppResult<BookingStatus> {
        self.status.parse().map_err(|_| {
            AppError::ConversionEntityError(format!(
                "unknown booking status `{}` for booking {}",
                self.status, self.booking_id
            ))
        })
    }

    pub fn try_into_booking(self, rooms: Vec<BookedRoom>) -> AppResult<Booking> {
        let status = self.parse_status()?;
        let BookingRow {
            booking_id,
            ordered_at,
            arrival_at,
            departure_at,
            user_id,
            phone_number,
            ..
        } = self;
        Ok(Booking {
            booking_id: BookingId::from(booking_id),
            ordered_at,
            stay: StayWindow::new(arrival_at, departure_at),
            booked_by: user_id.map(UserId::from),
            phone_number,
            status,
            rooms,
        })
    }
}

// one row per (booking, physical room) pair, joined with the room type
#[derive(sqlx::FromRow)]
pub struct BookedRoomRow {
    pub booking_id: Uuid,
    pub physical_room_id: Uuid,
    pub room_number: String,
    pub room_type_id: Uuid,
    pub category: String,
    pub price_per_night: f64,
}

impl From<BookedRoomRow> for BookedRoom {
    fn from(value: BookedRoomRow) -> Self {
        let BookedRoomRow {
            physical_room_id,
            room_number,
            room_type_id,
            category,
            price_per_night,
            ..
        } = value;
        BookedRoom {
            physical_room_id: PhysicalRoomId::from(physical_room_id),
            room_number,
            room_type_id: RoomTypeId::from(room_type_id),
            category,
            price_per_night,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(status: &str) -> BookingRow {
        BookingRow {
            booking_id: Uuid::new_v4(),
            ordered_at: Utc::now(),
            arrival_at: Utc::now(),
            departure_at: Utc::now(),
            user_id: None,
            phone_number: "+380501112233".into(),
            status: status.into(),
        }
    }

    #[test]
    fn known_status_is_mapped() {
        let booking = sample_row("confirmed").try_into_booking(vec![]).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.is_guest());
    }

    #[test]
    fn unknown_status_is_a_conversion_error() {
        let res = sample_row("lost").try_into_booking(vec![]);
        assert!(matches!(res, Err(AppError::ConversionEntityError(_))));
    }
}
