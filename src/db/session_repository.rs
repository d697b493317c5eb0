// src/db/session_repository.rs
// DOCUMENTATION: Login session storage (sha256 of the bearer token only)

use crate::errors::MarketplaceError;
use crate::models::Session;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct SessionRepository;

impl SessionRepository {
    pub async fn create(
        pool: &PgPool,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, MarketplaceError> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Create session", e))
    }

    pub async fn find(pool: &PgPool, token_hash: &str) -> Result<Option<Session>, MarketplaceError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch session", e))
    }

    pub async fn delete(pool: &PgPool, token_hash: &str) -> Result<u64, MarketplaceError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Delete session", e))?;

        Ok(result.rows_affected())
    }

    /// Remove expired sessions; returns how many were deleted
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, MarketplaceError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Purge sessions", e))?;

        Ok(result.rows_affected())
    }
}
