// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for artist applications and moderation
// PURPOSE: Expose admin operations via REST endpoints

use super::auth::verify_admin;
use crate::config::Config;
use crate::errors::MarketplaceError;
use crate::models::ApplicationStatus;
use crate::services::{AdminService, DashboardService, ProfileCache};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// GET /admin/artists/pending
/// List artist applications awaiting review
///
/// DOCUMENTATION: Requires X-Admin-Token or an admin session
pub async fn pending_artists(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, MarketplaceError> {
    verify_admin(&req, pool.get_ref(), &config).await?;

    let artists = AdminService::pending_artists(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(artists))
}

/// POST /admin/artists/{id}/approve
pub async fn approve_artist(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    verify_admin(&req, pool.get_ref(), &config).await?;

    let profile = AdminService::decide(
        pool.get_ref(),
        cache.get_ref(),
        path.into_inner(),
        ApplicationStatus::Approved,
    )
    .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /admin/artists/{id}/reject
pub async fn reject_artist(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    verify_admin(&req, pool.get_ref(), &config).await?;

    let profile = AdminService::decide(
        pool.get_ref(),
        cache.get_ref(),
        path.into_inner(),
        ApplicationStatus::Rejected,
    )
    .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /admin/users/{id}/deactivate
/// Deactivate an account; its sessions then get 403
pub async fn deactivate_user(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    verify_admin(&req, pool.get_ref(), &config).await?;

    let user = AdminService::deactivate(pool.get_ref(), cache.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// GET /admin/stats
/// Marketplace statistics
///
/// DOCUMENTATION: Users by role, bookings by status, pending applications, tours.
/// Includes profile cache occupancy.
pub async fn marketplace_stats(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
) -> Result<impl Responder, MarketplaceError> {
    verify_admin(&req, pool.get_ref(), &config).await?;

    let stats = DashboardService::marketplace_stats(pool.get_ref()).await?;
    let cache_stats = cache.stats().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "marketplace": stats,
        "profile_cache": cache_stats,
    })))
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/artists/pending", web::get().to(pending_artists))
            .route("/artists/{id}/approve", web::post().to(approve_artist))
            .route("/artists/{id}/reject", web::post().to(reject_artist))
            .route("/users/{id}/deactivate", web::post().to(deactivate_user))
            .route("/stats", web::get().to(marketplace_stats)),
    );
}
