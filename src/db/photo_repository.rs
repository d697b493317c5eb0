// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Handle CRUD operations for profile photos

use crate::errors::MarketplaceError;
use crate::models::{CreatePhotoRequest, Photo, MAX_PHOTOS_PER_USER};
use sqlx::PgPool;
use uuid::Uuid;

fn ensure_room(existing: i64) -> Result<(), MarketplaceError> {
    if existing >= MAX_PHOTOS_PER_USER {
        return Err(MarketplaceError::Conflict(format!(
            "A profile holds at most {} photos",
            MAX_PHOTOS_PER_USER
        )));
    }
    Ok(())
}

pub struct PhotoRepository;

impl PhotoRepository {
    /// Create a new photo
    /// DOCUMENTATION: the user row is locked while the photo count is checked, so
    /// concurrent uploads cannot pass the limit together. A new primary photo clears
    /// the flag on the user's other photos; without an explicit order the photo goes last
    pub async fn create_photo(
        pool: &PgPool,
        user_id: Uuid,
        req: &CreatePhotoRequest,
    ) -> Result<Photo, MarketplaceError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| MarketplaceError::from_db("Begin photo insert", e))?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| MarketplaceError::from_db("Lock user", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("User {}", user_id)))?;

        let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| MarketplaceError::from_db("Count photos", e))?;
        ensure_room(existing.0)?;

        if req.is_primary {
            sqlx::query("UPDATE photos SET is_primary = FALSE, updated_at = NOW() WHERE user_id = $1 AND is_primary")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| MarketplaceError::from_db("Clear primary photo", e))?;
        }

        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (
                user_id, photo_url, thumbnail_url, width, height, caption,
                is_primary, display_order
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                COALESCE($8, (SELECT COALESCE(MAX(display_order) + 1, 0) FROM photos WHERE user_id = $1))
            )
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&req.photo_url)
        .bind(&req.thumbnail_url)
        .bind(req.width)
        .bind(req.height)
        .bind(&req.caption)
        .bind(req.is_primary)
        .bind(req.display_order)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| MarketplaceError::from_db("Create photo", e))?;

        tx.commit()
            .await
            .map_err(|e| MarketplaceError::from_db("Commit photo insert", e))?;

        Ok(photo)
    }

    /// Get photos for a user
    /// DOCUMENTATION: ordered by display_order, primary first on ties
    pub async fn get_photos_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Photo>, MarketplaceError> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT * FROM photos
            WHERE user_id = $1
            ORDER BY display_order, is_primary DESC, created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Fetch photos", e))
    }

    pub async fn get_photo(pool: &PgPool, id: Uuid) -> Result<Photo, MarketplaceError> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch photo", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Photo {}", id)))
    }

    pub async fn delete_photo(pool: &PgPool, id: Uuid) -> Result<(), MarketplaceError> {
        sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Delete photo", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_limit() {
        assert!(ensure_room(0).is_ok());
        assert!(ensure_room(MAX_PHOTOS_PER_USER - 1).is_ok());
        assert!(matches!(
            ensure_room(MAX_PHOTOS_PER_USER),
            Err(MarketplaceError::Conflict(_))
        ));
    }
}
