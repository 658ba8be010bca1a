use derive_new::new;

use crate::model::id::RoomTypeId;

#[derive(Debug, new)]
pub struct CreateRoomType {
    pub price_per_night: f64,
    pub description: String,
    pub category: String,
    pub guest_capacity: i32,
    pub facilities: Vec<String>,
    // room numbers of the physical rooms created alongside the type
    pub room_numbers: Vec<String>,
}

#[derive(Debug, new)]
pub struct UpdateRoomType {
    pub room_type_id: RoomTypeId,
    pub price_per_night: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub guest_capacity: Option<i32>,
    pub facilities: Option<Vec<String>>,
}

#[derive(Debug, Default, new)]
pub struct RoomTypeFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_guests: Option<i32>,
    pub facility: Option<String>,
}
