use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::room::{
    delete_room_type, register_room_type, show_room_type, show_room_type_list, update_room_type,
};

pub fn build_room_routers() -> Router<AppRegistry> {
    let room_routers = Router::new()
        .route("/", post(register_room_type))
        .route("/", get(show_room_type_list))
        .route("/:room_type_id", get(show_room_type))
        .route("/:room_type_id", put(update_room_type))
        .route("/:room_type_id", delete(delete_room_type));

    Router::new().nest("/rooms", room_routers)
}
