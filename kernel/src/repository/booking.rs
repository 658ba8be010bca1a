use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{BookingFilter, CreateBooking, UpdateBooking, UpdateBookingStatus},
        Booking, BookingStatus, StayWindow,
    },
    id::{BookingId, PhysicalRoomId, UserId},
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Creates a booking with its room associations. The availability
    /// check and the insert run in one serializable transaction so that
    /// two concurrent requests cannot both claim the same rooms.
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId>;

    /// True iff none of the given rooms is held by a pending or confirmed
    /// booking whose stay strictly overlaps the window. An empty room set
    /// is reported unavailable.
    async fn is_available(
        &self,
        room_ids: &[PhysicalRoomId],
        stay: &StayWindow,
    ) -> AppResult<bool>;

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;

    /// A user's bookings, newest arrival first.
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Booking>>;

    async fn find_all(&self, filter: BookingFilter) -> AppResult<Vec<Booking>>;

    async fn update(&self, event: UpdateBooking) -> AppResult<()>;

    /// Applies a validated status transition and returns the prior status,
    /// which the caller compares against the new one before firing any
    /// completion side effects.
    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<BookingStatus>;

    /// Detaches all room associations, then removes the booking. Returns
    /// false when the booking was already absent.
    async fn delete(&self, booking_id: BookingId) -> AppResult<bool>;

    async fn count_completed_by_user(&self, user_id: UserId) -> AppResult<i64>;

    /// Strict guest link: only bookings without an owner are claimed, so
    /// re-running the same sync is a no-op.
    async fn link_guest_bookings(
        &self,
        user_id: UserId,
        booking_ids: &[BookingId],
    ) -> AppResult<u64>;

    /// Permissive owner reassignment for the trusted service-to-service
    /// path; overwrites any current owner.
    async fn reassign_owner(&self, user_id: UserId, booking_ids: &[BookingId])
        -> AppResult<u64>;
}
