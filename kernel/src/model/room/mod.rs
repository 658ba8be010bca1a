use crate::model::id::{PhysicalRoomId, RoomTypeId};

pub mod event;

/// A bookable category of rooms sharing price, description and capacity.
#[derive(Debug)]
pub struct RoomType {
    pub room_type_id: RoomTypeId,
    pub price_per_night: f64,
    pub description: String,
    pub category: String,
    pub guest_capacity: i32,
    pub facilities: Vec<String>,
    pub physical_rooms: Vec<PhysicalRoom>,
}

/// One concrete, uniquely numbered room belonging to a room type.
#[derive(Debug, Clone)]
pub struct PhysicalRoom {
    pub physical_room_id: PhysicalRoomId,
    pub room_type_id: RoomTypeId,
    pub room_number: String,
}
