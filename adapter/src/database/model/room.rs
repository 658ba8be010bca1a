use kernel::model::{
    id::{PhysicalRoomId, RoomTypeId},
    room::{PhysicalRoom, RoomType},
};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct RoomTypeRow {
    pub room_type_id: Uuid,
    pub price_per_night: f64,
    pub description: String,
    pub category: String,
    pub guest_capacity: i32,
    pub facilities: Json<Vec<String>>,
}

impl RoomTypeRow {
    pub fn into_room_type(self, physical_rooms: Vec<PhysicalRoom>) -> RoomType {
        let RoomTypeRow {
            room_type_id,
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities,
        } = self;
        RoomType {
            room_type_id: RoomTypeId::from(room_type_id),
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities: facilities.0,
            physical_rooms,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct PhysicalRoomRow {
    pub physical_room_id: Uuid,
    pub room_type_id: Uuid,
    pub room_number: String,
}

impl From<PhysicalRoomRow> for PhysicalRoom {
    fn from(value: PhysicalRoomRow) -> Self {
        let PhysicalRoomRow {
            physical_room_id,
            room_type_id,
            room_number,
        } = value;
        PhysicalRoom {
            physical_room_id: PhysicalRoomId::from(physical_room_id),
            room_type_id: RoomTypeId::from(room_type_id),
            room_number,
        }
    }
}
