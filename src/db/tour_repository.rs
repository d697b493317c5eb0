// src/db/tour_repository.rs
// DOCUMENTATION: Tour segment and state range persistence
// PURPOSE: Segments and their ranges are always written together in one transaction

use crate::errors::MarketplaceError;
use crate::models::{PassingThrough, StateRange, TourSegment};
use crate::services::tour_planner::{PlannedRange, TourSubmission};
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

pub struct TourRepository;

impl TourRepository {
    async fn insert_ranges(
        tx: &mut Transaction<'_, Postgres>,
        segment_id: Uuid,
        ranges: &[PlannedRange],
    ) -> Result<(), MarketplaceError> {
        for (position, range) in ranges.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO state_ranges (
                    id, segment_id, state, start_date, end_date, cities, notes, position
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(range.id)
            .bind(segment_id)
            .bind(&range.state)
            .bind(range.start_date)
            .bind(range.end_date)
            .bind(&range.cities)
            .bind(&range.notes)
            .bind(position as i32)
            .execute(&mut **tx)
            .await
            .map_err(|e| MarketplaceError::from_db("State range", e))?;
        }
        Ok(())
    }

    /// Create a segment with its ranges; positions follow submission order
    pub async fn create_segment(
        pool: &PgPool,
        artist_id: Uuid,
        submission: &TourSubmission,
    ) -> Result<TourSegment, MarketplaceError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| MarketplaceError::from_db("Begin tour insert", e))?;

        let mut segment = sqlx::query_as::<_, TourSegment>(
            r#"
            INSERT INTO tour_segments (artist_id, name, notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(artist_id)
        .bind(&submission.name)
        .bind(&submission.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| MarketplaceError::from_db("Create tour segment", e))?;

        Self::insert_ranges(&mut tx, segment.id, &submission.ranges).await?;

        tx.commit()
            .await
            .map_err(|e| MarketplaceError::from_db("Commit tour insert", e))?;

        segment.state_ranges = Self::to_state_ranges(segment.id, &submission.ranges);
        log::info!(
            "Created tour segment {} with {} state ranges",
            segment.id,
            segment.state_ranges.len()
        );
        Ok(segment)
    }

    /// Overwrite name, notes and every range of a segment
    pub async fn replace_segment(
        pool: &PgPool,
        segment_id: Uuid,
        submission: &TourSubmission,
    ) -> Result<TourSegment, MarketplaceError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| MarketplaceError::from_db("Begin tour update", e))?;

        let mut segment = sqlx::query_as::<_, TourSegment>(
            r#"
            UPDATE tour_segments SET name = $2, notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(segment_id)
        .bind(&submission.name)
        .bind(&submission.notes)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| MarketplaceError::from_db("Update tour segment", e))?
        .ok_or_else(|| MarketplaceError::NotFound(format!("Tour segment {}", segment_id)))?;

        sqlx::query("DELETE FROM state_ranges WHERE segment_id = $1")
            .bind(segment_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| MarketplaceError::from_db("Clear state ranges", e))?;

        Self::insert_ranges(&mut tx, segment_id, &submission.ranges).await?;

        tx.commit()
            .await
            .map_err(|e| MarketplaceError::from_db("Commit tour update", e))?;

        segment.state_ranges = Self::to_state_ranges(segment_id, &submission.ranges);
        Ok(segment)
    }

    fn to_state_ranges(segment_id: Uuid, ranges: &[PlannedRange]) -> Vec<StateRange> {
        ranges
            .iter()
            .enumerate()
            .map(|(position, r)| StateRange {
                id: r.id,
                segment_id,
                state: r.state.clone(),
                start_date: r.start_date,
                end_date: r.end_date,
                cities: r.cities.clone(),
                notes: r.notes.clone(),
                position: position as i32,
            })
            .collect()
    }

    /// Attach ranges to already loaded segments
    async fn load_ranges(pool: &PgPool, segments: &mut [TourSegment]) -> Result<(), MarketplaceError> {
        if segments.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = segments.iter().map(|s| s.id).collect();

        let ranges = sqlx::query_as::<_, StateRange>(
            r#"
            SELECT * FROM state_ranges
            WHERE segment_id = ANY($1)
            ORDER BY segment_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Fetch state ranges", e))?;

        let mut by_segment: HashMap<Uuid, Vec<StateRange>> = HashMap::new();
        for range in ranges {
            by_segment.entry(range.segment_id).or_default().push(range);
        }
        for segment in segments.iter_mut() {
            segment.state_ranges = by_segment.remove(&segment.id).unwrap_or_default();
        }
        Ok(())
    }

    pub async fn get_segment(pool: &PgPool, id: Uuid) -> Result<TourSegment, MarketplaceError> {
        let segment = sqlx::query_as::<_, TourSegment>("SELECT * FROM tour_segments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch tour segment", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Tour segment {}", id)))?;

        let mut segments = [segment];
        Self::load_ranges(pool, &mut segments).await?;
        let [segment] = segments;
        Ok(segment)
    }

    /// All segments of an artist; `upcoming_only` keeps segments with a range ending today or later
    pub async fn list_by_artist(
        pool: &PgPool,
        artist_id: Uuid,
        upcoming_only: bool,
    ) -> Result<Vec<TourSegment>, MarketplaceError> {
        let mut segments = sqlx::query_as::<_, TourSegment>(
            r#"
            SELECT ts.* FROM tour_segments ts
            WHERE ts.artist_id = $1
              AND (NOT $2 OR EXISTS (
                  SELECT 1 FROM state_ranges sr
                  WHERE sr.segment_id = ts.id AND sr.end_date >= CURRENT_DATE
              ))
            ORDER BY ts.created_at
            "#,
        )
        .bind(artist_id)
        .bind(upcoming_only)
        .fetch_all(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("List tour segments", e))?;

        Self::load_ranges(pool, &mut segments).await?;
        Ok(segments)
    }

    pub async fn delete_segment(pool: &PgPool, id: Uuid) -> Result<(), MarketplaceError> {
        let result = sqlx::query("DELETE FROM tour_segments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Delete tour segment", e))?;

        if result.rows_affected() == 0 {
            return Err(MarketplaceError::NotFound(format!("Tour segment {}", id)));
        }
        Ok(())
    }

    /// Count segments, optionally for a single artist
    pub async fn count(pool: &PgPool, artist_id: Option<Uuid>) -> Result<i64, MarketplaceError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tour_segments WHERE ($1::uuid IS NULL OR artist_id = $1)",
        )
        .bind(artist_id)
        .fetch_one(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Count tour segments", e))?;

        Ok(count.0)
    }

    /// Approved artists' ranges in `state` intersecting the optional window
    pub async fn passing_through(
        pool: &PgPool,
        state: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PassingThrough>, MarketplaceError> {
        sqlx::query_as::<_, PassingThrough>(
            r#"
            SELECT
                ap.user_id AS artist_id, ap.stage_name,
                ts.id AS segment_id, ts.name AS segment_name,
                sr.state, sr.start_date, sr.end_date, sr.cities
            FROM state_ranges sr
            JOIN tour_segments ts ON ts.id = sr.segment_id
            JOIN artist_profiles ap ON ap.user_id = ts.artist_id
            JOIN users u ON u.id = ap.user_id
            WHERE sr.state = $1
              AND ap.application_status = 'approved'
              AND u.is_active
              AND sr.end_date >= COALESCE($2, CURRENT_DATE)
              AND ($3::date IS NULL OR sr.start_date <= $3)
            ORDER BY sr.start_date, ap.stage_name
            "#,
        )
        .bind(state)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Passing-through search", e))
    }
}
