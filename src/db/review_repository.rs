// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: One review per author per booking, enforced by a unique constraint

use crate::errors::MarketplaceError;
use crate::models::Review;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewRepository;

impl ReviewRepository {
    pub async fn create_review(
        pool: &PgPool,
        booking_id: Uuid,
        author_id: Uuid,
        subject_id: Uuid,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<Review, MarketplaceError> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (booking_id, author_id, subject_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(author_id)
        .bind(subject_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Review for this booking", e))
    }

    /// Reviews about a user, newest first
    pub async fn get_reviews_by_subject(
        pool: &PgPool,
        subject_id: Uuid,
    ) -> Result<Vec<Review>, MarketplaceError> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE subject_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(subject_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for user {}: {}", subject_id, e);
            MarketplaceError::DatabaseError(format!("Fetch reviews failed: {}", e))
        })
    }
}
