// src/services/photo_service.rs
// DOCUMENTATION: Profile photo metadata registered after an upload

use crate::db::{PhotoRepository, UserRepository};
use crate::errors::MarketplaceError;
use crate::models::{CreatePhotoRequest, PhotoResponse, Role, User};
use crate::services::ProfileCache;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct PhotoService;

impl PhotoService {
    /// POST /api/upload
    pub async fn register(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        req: CreatePhotoRequest,
    ) -> Result<PhotoResponse, MarketplaceError> {
        req.validate()?;
        if let Some(order) = req.display_order {
            if order < 0 {
                return Err(MarketplaceError::ValidationError(
                    "display_order must not be negative".to_string(),
                ));
            }
        }

        let photo = PhotoRepository::create_photo(pool, user.id, &req).await?;
        cache.invalidate_user(user.id).await;
        Ok(photo.to_response())
    }

    /// GET /api/users/{id}/photos
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<PhotoResponse>, MarketplaceError> {
        UserRepository::get_by_id(pool, user_id).await?;
        let photos = PhotoRepository::get_photos_by_user(pool, user_id).await?;
        Ok(photos.iter().map(|p| p.to_response()).collect())
    }

    /// DELETE /api/photos/{id}
    pub async fn delete(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        id: Uuid,
    ) -> Result<(), MarketplaceError> {
        let photo = PhotoRepository::get_photo(pool, id).await?;
        if photo.user_id != user.id && user.role != Role::Admin {
            return Err(MarketplaceError::Forbidden);
        }

        PhotoRepository::delete_photo(pool, id).await?;
        cache.invalidate_user(photo.user_id).await;
        Ok(())
    }
}
