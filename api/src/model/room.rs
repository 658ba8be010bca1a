use garde::Validate;
use serde::{Deserialize, Serialize};

use kernel::model::{
    id::{PhysicalRoomId, RoomTypeId},
    room::{
        event::{CreateRoomType, RoomTypeFilter, UpdateRoomType},
        PhysicalRoom, RoomType,
    },
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomTypeRequest {
    #[garde(range(min = 0.0))]
    pub price_per_night: f64,
    #[garde(length(min = 1, max = 400))]
    pub description: String,
    #[garde(length(min = 1, max = 50))]
    pub category: String,
    #[garde(range(min = 1))]
    pub guest_capacity: i32,
    #[garde(skip)]
    #[serde(default)]
    pub facilities: Vec<String>,
    #[garde(length(min = 1))]
    pub room_numbers: Vec<String>,
}

impl From<CreateRoomTypeRequest> for CreateRoomType {
    fn from(value: CreateRoomTypeRequest) -> Self {
        let CreateRoomTypeRequest {
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities,
            room_numbers,
        } = value;
        Self {
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities,
            room_numbers,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomTypeRequest {
    #[garde(inner(range(min = 0.0)))]
    pub price_per_night: Option<f64>,
    #[garde(inner(length(min = 1, max = 400)))]
    pub description: Option<String>,
    #[garde(inner(length(min = 1, max = 50)))]
    pub category: Option<String>,
    #[garde(inner(range(min = 1)))]
    pub guest_capacity: Option<i32>,
    #[garde(skip)]
    pub facilities: Option<Vec<String>>,
}

impl UpdateRoomTypeRequest {
    pub fn into_event(self, room_type_id: RoomTypeId) -> UpdateRoomType {
        let UpdateRoomTypeRequest {
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities,
        } = self;
        UpdateRoomType {
            room_type_id,
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeFilterQuery {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_guests: Option<i32>,
    pub facility: Option<String>,
}

impl From<RoomTypeFilterQuery> for RoomTypeFilter {
    fn from(value: RoomTypeFilterQuery) -> Self {
        let RoomTypeFilterQuery {
            min_price,
            max_price,
            min_guests,
            facility,
        } = value;
        Self {
            min_price,
            max_price,
            min_guests,
            facility,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypesResponse {
    pub items: Vec<RoomTypeResponse>,
}

impl From<Vec<RoomType>> for RoomTypesResponse {
    fn from(value: Vec<RoomType>) -> Self {
        Self {
            items: value.into_iter().map(RoomTypeResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeResponse {
    pub room_type_id: RoomTypeId,
    pub price_per_night: f64,
    pub description: String,
    pub category: String,
    pub guest_capacity: i32,
    pub facilities: Vec<String>,
    pub physical_rooms: Vec<PhysicalRoomResponse>,
}

impl From<RoomType> for RoomTypeResponse {
    fn from(value: RoomType) -> Self {
        let RoomType {
            room_type_id,
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities,
            physical_rooms,
        } = value;
        Self {
            room_type_id,
            price_per_night,
            description,
            category,
            guest_capacity,
            facilities,
            physical_rooms: physical_rooms
                .into_iter()
                .map(PhysicalRoomResponse::from)
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalRoomResponse {
    pub physical_room_id: PhysicalRoomId,
    pub room_number: String,
}

impl From<PhysicalRoom> for PhysicalRoomResponse {
    fn from(value: PhysicalRoom) -> Self {
        let PhysicalRoom {
            physical_room_id,
            room_number,
            ..
        } = value;
        Self {
            physical_room_id,
            room_number,
        }
    }
}
