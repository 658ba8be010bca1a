use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use sqlx::{types::Json, QueryBuilder};
use uuid::Uuid;

use kernel::model::{
    id::{PhysicalRoomId, RoomTypeId},
    room::{
        event::{CreateRoomType, RoomTypeFilter, UpdateRoomType},
        PhysicalRoom, RoomType,
    },
};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::room::{PhysicalRoomRow, RoomTypeRow},
    ConnectionPool,
};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoomType) -> AppResult<RoomTypeId> {
        let mut tx = self.db.begin().await?;

        let room_type_id = RoomTypeId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO room_types
                (room_type_id, price_per_night, description, category, guest_capacity, facilities)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(room_type_id.raw())
        .bind(event.price_per_night)
        .bind(&event.description)
        .bind(&event.category)
        .bind(event.guest_capacity)
        .bind(Json(&event.facilities))
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no room type record has been created".into(),
            ));
        }

        if !event.room_numbers.is_empty() {
            sqlx::query(
                r#"
                    INSERT INTO physical_rooms (physical_room_id, room_type_id, room_number)
                    SELECT gen_random_uuid(), $1, unnest($2::varchar[])
                "#,
            )
            .bind(room_type_id.raw())
            .bind(&event.room_numbers)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(room_type_id)
    }

    async fn find_all(&self, filter: RoomTypeFilter) -> AppResult<Vec<RoomType>> {
        let mut builder = QueryBuilder::new(
            "SELECT room_type_id, price_per_night, description, category, \
             guest_capacity, facilities FROM room_types WHERE 1 = 1",
        );
        if let Some(min_price) = filter.min_price {
            builder.push(" AND price_per_night >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            builder.push(" AND price_per_night <= ").push_bind(max_price);
        }
        if let Some(min_guests) = filter.min_guests {
            builder.push(" AND guest_capacity >= ").push_bind(min_guests);
        }
        if let Some(facility) = filter.facility {
            // JSONB containment on the facility tag array
            builder
                .push(" AND facilities @> ")
                .push_bind(Json(vec![facility]));
        }
        builder.push(" ORDER BY price_per_night ASC");

        let rows: Vec<RoomTypeRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        let type_ids: Vec<Uuid> = rows.iter().map(|r| r.room_type_id).collect();
        let mut rooms = self.physical_rooms_by_type_ids(&type_ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let physical = rooms.remove(&row.room_type_id).unwrap_or_default();
                row.into_room_type(physical)
            })
            .collect())
    }

    async fn find_by_id(&self, room_type_id: RoomTypeId) -> AppResult<Option<RoomType>> {
        let row: Option<RoomTypeRow> = sqlx::query_as(
            r#"
                SELECT room_type_id, price_per_night, description, category,
                       guest_capacity, facilities
                FROM room_types
                WHERE room_type_id = $1
            "#,
        )
        .bind(room_type_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            None => Ok(None),
            Some(row) => {
                let mut rooms = self.physical_rooms_by_type_ids(&[row.room_type_id]).await?;
                let physical = rooms.remove(&row.room_type_id).unwrap_or_default();
                Ok(Some(row.into_room_type(physical)))
            }
        }
    }

    async fn find_physical_rooms_by_ids(
        &self,
        ids: &[PhysicalRoomId],
    ) -> AppResult<Vec<PhysicalRoom>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows: Vec<PhysicalRoomRow> = sqlx::query_as(
            r#"
                SELECT physical_room_id, room_type_id, room_number
                FROM physical_rooms
                WHERE physical_room_id = ANY($1)
            "#,
        )
        .bind(ids.iter().map(|id| id.raw()).collect::<Vec<_>>())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(PhysicalRoom::from).collect())
    }

    async fn update(&self, event: UpdateRoomType) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar(
            "SELECT room_type_id FROM room_types WHERE room_type_id = $1 FOR UPDATE",
        )
        .bind(event.room_type_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if exists.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "room type {} was not found",
                event.room_type_id
            )));
        }

        if let Some(price_per_night) = event.price_per_night {
            sqlx::query("UPDATE room_types SET price_per_night = $1 WHERE room_type_id = $2")
                .bind(price_per_night)
                .bind(event.room_type_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }
        if let Some(description) = event.description {
            sqlx::query("UPDATE room_types SET description = $1 WHERE room_type_id = $2")
                .bind(description)
                .bind(event.room_type_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }
        if let Some(category) = event.category {
            sqlx::query("UPDATE room_types SET category = $1 WHERE room_type_id = $2")
                .bind(category)
                .bind(event.room_type_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }
        if let Some(guest_capacity) = event.guest_capacity {
            sqlx::query("UPDATE room_types SET guest_capacity = $1 WHERE room_type_id = $2")
                .bind(guest_capacity)
                .bind(event.room_type_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }
        if let Some(facilities) = event.facilities {
            sqlx::query("UPDATE room_types SET facilities = $1 WHERE room_type_id = $2")
                .bind(Json(facilities))
                .bind(event.room_type_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }

    async fn delete(&self, room_type_id: RoomTypeId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM physical_rooms WHERE room_type_id = $1")
            .bind(room_type_id.raw())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        let res = sqlx::query("DELETE FROM room_types WHERE room_type_id = $1")
            .bind(room_type_id.raw())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "room type {room_type_id} was not found"
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }
}

impl RoomRepositoryImpl {
    async fn physical_rooms_by_type_ids(
        &self,
        type_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<PhysicalRoom>>> {
        if type_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<PhysicalRoomRow> = sqlx::query_as(
            r#"
                SELECT physical_room_id, room_type_id, room_number
                FROM physical_rooms
                WHERE room_type_id = ANY($1)
                ORDER BY room_number ASC
            "#,
        )
        .bind(type_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut grouped: HashMap<Uuid, Vec<PhysicalRoom>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.room_type_id)
                .or_default()
                .push(PhysicalRoom::from(row));
        }
        Ok(grouped)
    }
}
