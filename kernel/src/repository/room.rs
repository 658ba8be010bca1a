use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{PhysicalRoomId, RoomTypeId},
    room::{
        event::{CreateRoomType, RoomTypeFilter, UpdateRoomType},
        PhysicalRoom, RoomType,
    },
};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Creates a room type together with its physical rooms.
    async fn create(&self, event: CreateRoomType) -> AppResult<RoomTypeId>;
    async fn find_all(&self, filter: RoomTypeFilter) -> AppResult<Vec<RoomType>>;
    async fn find_by_id(&self, room_type_id: RoomTypeId) -> AppResult<Option<RoomType>>;
    async fn find_physical_rooms_by_ids(
        &self,
        ids: &[PhysicalRoomId],
    ) -> AppResult<Vec<PhysicalRoom>>;
    async fn update(&self, event: UpdateRoomType) -> AppResult<()>;
    async fn delete(&self, room_type_id: RoomTypeId) -> AppResult<()>;
}
