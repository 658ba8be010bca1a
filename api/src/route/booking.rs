use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    check_availability, create_booking, delete_booking, set_booking_owner, show_booking,
    show_booking_list, show_my_bookings, sync_guest_bookings, update_booking,
    update_booking_status,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(create_booking))
        .route("/", get(show_booking_list))
        .route("/availability", get(check_availability))
        .route("/me", get(show_my_bookings))
        .route("/sync", post(sync_guest_bookings))
        .route("/internal/set-owner", post(set_booking_owner))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id", put(update_booking))
        .route("/:booking_id", delete(delete_booking))
        .route("/:booking_id/status", patch(update_booking_status));

    Router::new().nest("/bookings", booking_routers)
}
