// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for reviews and profile photos

use super::auth::current_user;
use crate::errors::MarketplaceError;
use crate::models::{CreatePhotoRequest, CreateReviewRequest};
use crate::services::{PhotoService, ProfileCache, ReviewService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// POST /api/reviews
pub async fn create_review(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    body: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let review =
        ReviewService::create(pool.get_ref(), cache.get_ref(), &user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// GET /api/users/{id}/reviews
pub async fn user_reviews(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let reviews = ReviewService::list_for_user(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// POST /api/upload
/// Registers metadata of a photo already stored by the upload front end
pub async fn upload_photo(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    body: web::Json<CreatePhotoRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let photo =
        PhotoService::register(pool.get_ref(), cache.get_ref(), &user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(photo))
}

/// GET /api/users/{id}/photos
pub async fn user_photos(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let photos = PhotoService::list_for_user(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(photos))
}

/// DELETE /api/photos/{id}
pub async fn delete_photo(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    PhotoService::delete(pool.get_ref(), cache.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/reviews", web::post().to(create_review))
        .route("/api/users/{id}/reviews", web::get().to(user_reviews))
        .route("/api/upload", web::post().to(upload_photo))
        .route("/api/users/{id}/photos", web::get().to(user_photos))
        .route("/api/photos/{id}", web::delete().to(delete_photo));
}
