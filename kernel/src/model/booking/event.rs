use derive_new::new;

use crate::model::booking::{BookingStatus, StayWindow};
use crate::model::id::{BookingId, PhysicalRoomId, UserId};

#[derive(Debug, new)]
pub struct CreateBooking {
    pub phone_number: String,
    pub physical_room_ids: Vec<PhysicalRoomId>,
    pub stay: StayWindow,
    pub booked_by: Option<UserId>,
    pub status: BookingStatus,
}

#[derive(Debug, new)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub phone_number: Option<String>,
    pub stay: Option<StayWindow>,
    // Some(ids) replaces the booked room set wholesale
    pub physical_room_ids: Option<Vec<PhysicalRoomId>>,
}

#[derive(Debug, new)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub status: BookingStatus,
}

#[derive(Debug, Default, new)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub phone_number: Option<String>,
}
