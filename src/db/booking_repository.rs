// src/db/booking_repository.rs
// DOCUMENTATION: Booking and reservation database operations
// PURPOSE: Status changes are conditional on the current status so concurrent
// updates cannot skip a transition

use super::parse_column;
use crate::errors::MarketplaceError;
use crate::models::*;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct BookingRow {
    id: Uuid,
    artist_id: Uuid,
    host_id: Uuid,
    requested_by: Uuid,
    event_date: NaiveDate,
    status: String,
    includes_lodging: bool,
    message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, MarketplaceError> {
        Ok(Booking {
            id: self.id,
            artist_id: self.artist_id,
            host_id: self.host_id,
            requested_by: self.requested_by,
            event_date: self.event_date,
            status: parse_column("status", &self.status)?,
            includes_lodging: self.includes_lodging,
            message: self.message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Fields of a booking about to be inserted
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub artist_id: Uuid,
    pub host_id: Uuid,
    pub requested_by: Uuid,
    pub event_date: NaiveDate,
    pub includes_lodging: bool,
    pub message: Option<String>,
}

pub struct BookingRepository;

impl BookingRepository {
    /// Insert a pending booking
    /// DOCUMENTATION: a partial unique index refuses a second open booking for the host date
    pub async fn create(pool: &PgPool, new: &NewBooking) -> Result<Booking, MarketplaceError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (
                artist_id, host_id, requested_by, event_date, includes_lodging, message
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.artist_id)
        .bind(new.host_id)
        .bind(new.requested_by)
        .bind(new.event_date)
        .bind(new.includes_lodging)
        .bind(&new.message)
        .fetch_one(pool)
        .await
        .map_err(|e| match MarketplaceError::from_db("Create booking", e) {
            MarketplaceError::AlreadyExists(_) => MarketplaceError::Conflict(format!(
                "Host already has an open booking on {}",
                new.event_date
            )),
            other => other,
        })?;

        row.into_booking()
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Booking, MarketplaceError> {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch booking", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Booking {}", id)))?
            .into_booking()
    }

    /// Whether the host date is held by a pending or accepted booking
    pub async fn host_date_taken(
        pool: &PgPool,
        host_id: Uuid,
        event_date: NaiveDate,
    ) -> Result<bool, MarketplaceError> {
        let taken: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE host_id = $1 AND event_date = $2
                  AND status IN ('pending', 'accepted')
            )
            "#,
        )
        .bind(host_id)
        .bind(event_date)
        .fetch_one(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Check host date", e))?;

        Ok(taken.0)
    }

    /// Bookings where the user is artist or host, newest event first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<BookingStatus>,
        params: PageParams,
    ) -> Result<(Vec<Booking>, i64), MarketplaceError> {
        let status = status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT * FROM bookings
            WHERE (artist_id = $1 OR host_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY event_date DESC, created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("List bookings", e))?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE (artist_id = $1 OR host_id = $1)
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Count bookings", e))?;

        let bookings = rows
            .into_iter()
            .map(BookingRow::into_booking)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((bookings, total.0))
    }

    /// Move `id` from `from` to `to`; fails if the status changed meanwhile
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Booking, MarketplaceError> {
        sqlx::query_as::<_, BookingRow>(
            r#"
            UPDATE bookings SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Update booking status", e))?
        .ok_or_else(|| {
            MarketplaceError::InvalidTransition(format!(
                "Booking {} is no longer {}",
                id, from
            ))
        })?
        .into_booking()
    }

    /// Booking counts by status, for one user or the whole marketplace
    pub async fn count_by_status(
        pool: &PgPool,
        user_id: Option<Uuid>,
    ) -> Result<BTreeMap<String, i64>, MarketplaceError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*) FROM bookings
            WHERE ($1::uuid IS NULL OR artist_id = $1 OR host_id = $1)
            GROUP BY status
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Count bookings by status", e))?;

        Ok(rows.into_iter().collect())
    }

    /// Next accepted booking on or after today
    pub async fn next_upcoming(pool: &PgPool, user_id: Uuid) -> Result<Option<Booking>, MarketplaceError> {
        sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT * FROM bookings
            WHERE (artist_id = $1 OR host_id = $1)
              AND status = 'accepted'
              AND event_date >= CURRENT_DATE
            ORDER BY event_date
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Fetch next booking", e))?
        .map(BookingRow::into_booking)
        .transpose()
    }

    /// Reserve seats, holding a row lock on the booking while seats are counted
    pub async fn create_reservation(
        pool: &PgPool,
        booking_id: Uuid,
        fan_id: Uuid,
        seats: i32,
        capacity: i32,
    ) -> Result<Reservation, MarketplaceError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| MarketplaceError::from_db("Begin reservation", e))?;

        let status: Option<(String,)> =
            sqlx::query_as("SELECT status FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(booking_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| MarketplaceError::from_db("Lock booking", e))?;

        match status {
            None => return Err(MarketplaceError::NotFound(format!("Booking {}", booking_id))),
            Some((status,)) if status != BookingStatus::Accepted.as_str() => {
                return Err(MarketplaceError::Conflict(
                    "Seats can only be reserved for confirmed concerts".to_string(),
                ))
            }
            Some(_) => {}
        }

        let reserved: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(seats), 0)::bigint FROM reservations WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| MarketplaceError::from_db("Count reserved seats", e))?;

        if reserved.0 + seats as i64 > capacity as i64 {
            return Err(MarketplaceError::Conflict(format!(
                "Only {} seats left",
                (capacity as i64 - reserved.0).max(0)
            )));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (booking_id, fan_id, seats)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(fan_id)
        .bind(seats)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| MarketplaceError::from_db("Reservation", e))?;

        tx.commit()
            .await
            .map_err(|e| MarketplaceError::from_db("Commit reservation", e))?;

        Ok(reservation)
    }

    pub async fn delete_reservation(
        pool: &PgPool,
        booking_id: Uuid,
        fan_id: Uuid,
    ) -> Result<(), MarketplaceError> {
        let result = sqlx::query("DELETE FROM reservations WHERE booking_id = $1 AND fan_id = $2")
            .bind(booking_id)
            .bind(fan_id)
            .execute(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Delete reservation", e))?;

        if result.rows_affected() == 0 {
            return Err(MarketplaceError::NotFound("Reservation".to_string()));
        }
        Ok(())
    }

    pub async fn count_reservations_for_fan(pool: &PgPool, fan_id: Uuid) -> Result<i64, MarketplaceError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reservations WHERE fan_id = $1")
            .bind(fan_id)
            .fetch_one(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Count reservations", e))?;

        Ok(count.0)
    }
}
