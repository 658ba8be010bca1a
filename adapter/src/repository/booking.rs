use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use sqlx::QueryBuilder;
use uuid::Uuid;

use kernel::model::{
    booking::{
        event::{BookingFilter, CreateBooking, UpdateBooking, UpdateBookingStatus},
        BookedRoom, Booking, BookingStatus, StayWindow,
    },
    id::{BookingId, PhysicalRoomId, UserId},
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::booking::{BookedRoomRow, BookingRow},
    ConnectionPool,
};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
        // conservative: an empty selection can never be available
        if event.physical_room_ids.is_empty() {
            return Err(AppError::BookingConflict(
                "no rooms were selected for the booking".into(),
            ));
        }
        let room_ids = to_uuids(&event.physical_room_ids);

        let mut tx = self.db.begin().await?;

        // the availability check and the insert must not race with a
        // concurrent booking of the same rooms
        self.set_transaction_serializable(&mut tx).await?;

        let existing_rooms: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM physical_rooms WHERE physical_room_id = ANY($1)",
        )
        .bind(&room_ids)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if existing_rooms as usize != room_ids.len() {
            return Err(AppError::EntityNotFound(
                "some of the selected rooms do not exist".into(),
            ));
        }

        let conflicts: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(DISTINCT b.booking_id)
                FROM bookings AS b
                INNER JOIN booking_rooms AS br ON br.booking_id = b.booking_id
                WHERE br.physical_room_id = ANY($1)
                  AND b.status IN ('pending', 'confirmed')
                  AND b.arrival_at < $3
                  AND b.departure_at > $2
            "#,
        )
        .bind(&room_ids)
        .bind(event.stay.arrival)
        .bind(event.stay.departure)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if conflicts > 0 {
            return Err(AppError::BookingConflict(
                "the selected rooms are already booked for this period".into(),
            ));
        }

        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, user_id, phone_number, arrival_at, departure_at, status)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(booking_id.raw())
        .bind(event.booked_by.map(UserId::raw))
        .bind(&event.phone_number)
        .bind(event.stay.arrival)
        .bind(event.stay.departure)
        .bind(event.status.to_string())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been created".into(),
            ));
        }

        sqlx::query(
            r#"
                INSERT INTO booking_rooms (booking_id, physical_room_id)
                SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(booking_id.raw())
        .bind(&room_ids)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking_id)
    }

    async fn is_available(
        &self,
        room_ids: &[PhysicalRoomId],
        stay: &StayWindow,
    ) -> AppResult<bool> {
        if room_ids.is_empty() {
            return Ok(false);
        }
        let conflicts: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(DISTINCT b.booking_id)
                FROM bookings AS b
                INNER JOIN booking_rooms AS br ON br.booking_id = b.booking_id
                WHERE br.physical_room_id = ANY($1)
                  AND b.status IN ('pending', 'confirmed')
                  AND b.arrival_at < $3
                  AND b.departure_at > $2
            "#,
        )
        .bind(to_uuids(room_ids))
        .bind(stay.arrival)
        .bind(stay.departure)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(conflicts == 0)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
                SELECT booking_id, ordered_at, arrival_at, departure_at,
                       user_id, phone_number, status
                FROM bookings
                WHERE booking_id = $1
            "#,
        )
        .bind(booking_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            None => Ok(None),
            Some(row) => {
                let mut rooms = self.booked_rooms_for(&[row.booking_id]).await?;
                let booked = rooms.remove(&row.booking_id).unwrap_or_default();
                row.try_into_booking(booked).map(Some)
            }
        }
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
                SELECT booking_id, ordered_at, arrival_at, departure_at,
                       user_id, phone_number, status
                FROM bookings
                WHERE user_id = $1
                ORDER BY arrival_at DESC
            "#,
        )
        .bind(user_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        self.compose_bookings(rows).await
    }

    async fn find_all(&self, filter: BookingFilter) -> AppResult<Vec<Booking>> {
        let mut builder = QueryBuilder::new(
            "SELECT booking_id, ordered_at, arrival_at, departure_at, \
             user_id, phone_number, status FROM bookings WHERE 1 = 1",
        );
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(phone) = filter.phone_number {
            builder
                .push(" AND phone_number LIKE ")
                .push_bind(format!("%{phone}%"));
        }
        builder.push(" ORDER BY arrival_at DESC");

        let rows: Vec<BookingRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        self.compose_bookings(rows).await
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<()> {
        let revalidate = event.stay.is_some() || event.physical_room_ids.is_some();

        let mut tx = self.db.begin().await?;

        // a stay or room-set edit is another check-then-write on
        // availability and must not race with concurrent bookings
        if revalidate {
            self.set_transaction_serializable(&mut tx).await?;
        }

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT booking_id FROM bookings WHERE booking_id = $1 FOR UPDATE")
                .bind(event.booking_id.raw())
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if exists.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "booking {} was not found",
                event.booking_id
            )));
        }

        if let Some(phone_number) = event.phone_number {
            sqlx::query("UPDATE bookings SET phone_number = $1 WHERE booking_id = $2")
                .bind(phone_number)
                .bind(event.booking_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }
        if let Some(stay) = event.stay {
            sqlx::query("UPDATE bookings SET arrival_at = $1, departure_at = $2 WHERE booking_id = $3")
                .bind(stay.arrival)
                .bind(stay.departure)
                .bind(event.booking_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }
        if let Some(room_ids) = event.physical_room_ids {
            // whole-set replacement: re-resolve the physical rooms
            let room_ids = to_uuids(&room_ids);
            let existing_rooms: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM physical_rooms WHERE physical_room_id = ANY($1)",
            )
            .bind(&room_ids)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if existing_rooms as usize != room_ids.len() {
                return Err(AppError::EntityNotFound(
                    "some of the selected rooms do not exist".into(),
                ));
            }
            sqlx::query("DELETE FROM booking_rooms WHERE booking_id = $1")
                .bind(event.booking_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
            sqlx::query(
                r#"
                    INSERT INTO booking_rooms (booking_id, physical_room_id)
                    SELECT $1, unnest($2::uuid[])
                "#,
            )
            .bind(event.booking_id.raw())
            .bind(&room_ids)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        // re-check the edited booking's final rooms and window against
        // every other live booking before committing
        if revalidate {
            let conflicts: i64 = sqlx::query_scalar(
                r#"
                    SELECT COUNT(DISTINCT other.booking_id)
                    FROM bookings AS b
                    INNER JOIN booking_rooms AS br ON br.booking_id = b.booking_id
                    INNER JOIN booking_rooms AS obr
                        ON obr.physical_room_id = br.physical_room_id
                    INNER JOIN bookings AS other ON other.booking_id = obr.booking_id
                    WHERE b.booking_id = $1
                      AND other.booking_id <> b.booking_id
                      AND other.status IN ('pending', 'confirmed')
                      AND other.arrival_at < b.departure_at
                      AND other.departure_at > b.arrival_at
                "#,
            )
            .bind(event.booking_id.raw())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if conflicts > 0 {
                return Err(AppError::BookingConflict(
                    "the selected rooms are already booked for this period".into(),
                ));
            }
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }

    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<BookingStatus> {
        let mut tx = self.db.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM bookings WHERE booking_id = $1 FOR UPDATE")
                .bind(event.booking_id.raw())
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        let Some(current) = current else {
            return Err(AppError::EntityNotFound(format!(
                "booking {} was not found",
                event.booking_id
            )));
        };
        let old_status: BookingStatus = current.parse().map_err(|_| {
            AppError::ConversionEntityError(format!(
                "unknown booking status `{current}` for booking {}",
                event.booking_id
            ))
        })?;
        old_status.validate_transition(event.status)?;

        if old_status != event.status {
            sqlx::query("UPDATE bookings SET status = $1 WHERE booking_id = $2")
                .bind(event.status.to_string())
                .bind(event.booking_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(old_status)
    }

    async fn delete(&self, booking_id: BookingId) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;

        // room associations go first so the row never disappears while
        // still referenced
        sqlx::query("DELETE FROM booking_rooms WHERE booking_id = $1")
            .bind(booking_id.raw())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        let res = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(booking_id.raw())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_completed_by_user(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE user_id = $1 AND status = 'completed'",
        )
        .bind(user_id.raw())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn link_guest_bookings(
        &self,
        user_id: UserId,
        booking_ids: &[BookingId],
    ) -> AppResult<u64> {
        if booking_ids.is_empty() {
            return Ok(0);
        }
        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET user_id = $1
                WHERE booking_id = ANY($2) AND user_id IS NULL
            "#,
        )
        .bind(user_id.raw())
        .bind(booking_ids.iter().map(|id| id.raw()).collect::<Vec<_>>())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(res.rows_affected())
    }

    async fn reassign_owner(
        &self,
        user_id: UserId,
        booking_ids: &[BookingId],
    ) -> AppResult<u64> {
        if booking_ids.is_empty() {
            return Ok(0);
        }
        let res = sqlx::query("UPDATE bookings SET user_id = $1 WHERE booking_id = ANY($2)")
            .bind(user_id.raw())
            .bind(booking_ids.iter().map(|id| id.raw()).collect::<Vec<_>>())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(res.rows_affected())
    }
}

impl BookingRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn booked_rooms_for(
        &self,
        booking_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<BookedRoom>>> {
        let rows: Vec<BookedRoomRow> = sqlx::query_as(
            r#"
                SELECT br.booking_id, pr.physical_room_id, pr.room_number,
                       rt.room_type_id, rt.category, rt.price_per_night
                FROM booking_rooms AS br
                INNER JOIN physical_rooms AS pr
                    ON pr.physical_room_id = br.physical_room_id
                INNER JOIN room_types AS rt
                    ON rt.room_type_id = pr.room_type_id
                WHERE br.booking_id = ANY($1)
            "#,
        )
        .bind(booking_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut grouped: HashMap<Uuid, Vec<BookedRoom>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.booking_id)
                .or_default()
                .push(BookedRoom::from(row));
        }
        Ok(grouped)
    }

    async fn compose_bookings(&self, rows: Vec<BookingRow>) -> AppResult<Vec<Booking>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.booking_id).collect();
        let mut rooms = self.booked_rooms_for(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let booked = rooms.remove(&row.booking_id).unwrap_or_default();
                row.try_into_booking(booked)
            })
            .collect()
    }
}

fn to_uuids(ids: &[PhysicalRoomId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.raw()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use kernel::model::room::event::CreateRoomType;
    use kernel::repository::room::RoomRepository;

    use crate::repository::room::RoomRepositoryImpl;

    async fn seed_rooms(
        pool: &sqlx::PgPool,
        room_numbers: &[&str],
    ) -> anyhow::Result<Vec<PhysicalRoomId>> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let room_type_id = repo
            .create(CreateRoomType {
                price_per_night: 120.0,
                description: "Standard double room".into(),
                category: "standard".into(),
                guest_capacity: 2,
                facilities: vec!["wifi".into()],
                room_numbers: room_numbers.iter().map(|n| n.to_string()).collect(),
            })
            .await?;
        let room_type = repo.find_by_id(room_type_id).await?.unwrap();
        Ok(room_type
            .physical_rooms
            .iter()
            .map(|r| r.physical_room_id)
            .collect())
    }

    fn stay(arrival_day: u32, departure_day: u32) -> StayWindow {
        StayWindow::new(
            Utc.with_ymd_and_hms(2025, 6, arrival_day, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, departure_day, 11, 0, 0).unwrap(),
        )
    }

    fn booking_event(
        rooms: &[PhysicalRoomId],
        stay: StayWindow,
        booked_by: Option<UserId>,
    ) -> CreateBooking {
        CreateBooking::new(
            "+380501112233".into(),
            rooms.to_vec(),
            stay,
            booked_by,
            BookingStatus::Pending,
        )
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn overlapping_booking_of_the_same_room_is_rejected(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let rooms = seed_rooms(&pool, &["101"]).await?;
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool));

        repo.create(booking_event(&rooms, stay(10, 12), None)).await?;

        let res = repo.create(booking_event(&rooms, stay(11, 13), None)).await;
        assert!(matches!(res, Err(AppError::BookingConflict(_))));

        // back-to-back stays share a turnover day without conflicting
        repo.create(booking_event(&rooms, stay(12, 14), None)).await?;
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn guest_link_claims_unowned_bookings_only_once(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let rooms = seed_rooms(&pool, &["101"]).await?;
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool));
        let booking_id = repo.create(booking_event(&rooms, stay(10, 12), None)).await?;

        let owner = UserId::new();
        let linked = repo.link_guest_bookings(owner, &[booking_id]).await?;
        assert_eq!(linked, 1);

        // a later claim must not steal the booking
        let relinked = repo.link_guest_bookings(UserId::new(), &[booking_id]).await?;
        assert_eq!(relinked, 0);

        let booking = repo.find_by_id(booking_id).await?.unwrap();
        assert_eq!(booking.booked_by, Some(owner));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn delete_detaches_rooms_and_reports_a_missing_booking(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let rooms = seed_rooms(&pool, &["101"]).await?;
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool));
        let booking_id = repo.create(booking_event(&rooms, stay(10, 12), None)).await?;
        assert!(!repo.is_available(&rooms, &stay(10, 12)).await?);

        assert!(repo.delete(booking_id).await?);
        assert!(repo.is_available(&rooms, &stay(10, 12)).await?);
        assert!(repo.find_by_id(booking_id).await?.is_none());

        assert!(!repo.delete(booking_id).await?);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn update_into_an_overlap_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let rooms = seed_rooms(&pool, &["101", "102"]).await?;
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool));

        repo.create(booking_event(&rooms[..1], stay(10, 12), None)).await?;
        let second = repo
            .create(booking_event(&rooms[1..], stay(10, 12), None))
            .await?;

        // moving the second booking onto the first one's room must clash
        let res = repo
            .update(UpdateBooking::new(second, None, None, Some(rooms[..1].to_vec())))
            .await;
        assert!(matches!(res, Err(AppError::BookingConflict(_))));

        // the rejected edit must not have replaced the room set
        let booking = repo.find_by_id(second).await?.unwrap();
        assert_eq!(booking.rooms[0].physical_room_id, rooms[1]);

        // the same room is fine once the windows no longer overlap
        repo.update(UpdateBooking::new(
            second,
            None,
            Some(stay(14, 16)),
            Some(rooms[..1].to_vec()),
        ))
        .await?;
        Ok(())
    }
}
