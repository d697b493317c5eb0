// src/services/admin_service.rs
// DOCUMENTATION: Artist application review and account moderation

use crate::db::{ProfileRepository, UserRepository};
use crate::errors::MarketplaceError;
use crate::models::{ApplicationStatus, ArtistProfile, Role, UserResponse};
use crate::services::ProfileCache;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AdminService;

impl AdminService {
    pub async fn pending_artists(pool: &PgPool) -> Result<Vec<ArtistProfile>, MarketplaceError> {
        ProfileRepository::list_pending_artists(pool).await
    }

    /// Approve or reject a pending application
    pub async fn decide(
        pool: &PgPool,
        cache: &ProfileCache,
        artist_id: Uuid,
        decision: ApplicationStatus,
    ) -> Result<ArtistProfile, MarketplaceError> {
        if decision == ApplicationStatus::Pending {
            return Err(MarketplaceError::InvalidInput(
                "An application can only be approved or rejected".to_string(),
            ));
        }

        let profile = ProfileRepository::decide_application(pool, artist_id, decision).await?;
        cache.invalidate_user(artist_id).await;
        log::info!("Artist application {} {}", artist_id, decision.as_str());
        Ok(profile)
    }

    /// Deactivate an account; its sessions then get 403. Admin accounts are left alone.
    pub async fn deactivate(
        pool: &PgPool,
        cache: &ProfileCache,
        user_id: Uuid,
    ) -> Result<UserResponse, MarketplaceError> {
        let target = UserRepository::get_by_id(pool, user_id).await?;
        if target.role == Role::Admin {
            return Err(MarketplaceError::Forbidden);
        }

        let user = UserRepository::deactivate(pool, user_id).await?;
        cache.invalidate_user(user_id).await;
        log::info!("Deactivated {} account {}", user.role, user.id);
        Ok(user.to_response())
    }
}
