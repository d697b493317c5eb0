// src/handlers/tours.rs
// DOCUMENTATION: HTTP handlers for tour segments and their state ranges
// PURPOSE: Parse requests, resolve the caller, delegate to TourService

use super::auth::current_user;
use crate::errors::MarketplaceError;
use crate::models::{PassingThroughQuery, StateRangeDraft, TourSegmentRequest};
use crate::services::{ProfileCache, TourService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// GET /api/tour-segments
pub async fn list_segments(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let segments = TourService::list_mine(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(segments))
}

/// POST /api/tour-segments
pub async fn create_segment(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    body: web::Json<TourSegmentRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let segment =
        TourService::create(pool.get_ref(), cache.get_ref(), &user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(segment))
}

/// GET /api/tour-segments/{id}
pub async fn get_segment(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let segment = TourService::get(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(segment))
}

/// PUT /api/tour-segments/{id}
pub async fn replace_segment(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<TourSegmentRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let segment = TourService::replace(
        pool.get_ref(),
        cache.get_ref(),
        &user,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(segment))
}

/// DELETE /api/tour-segments/{id}
pub async fn delete_segment(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    TourService::delete(pool.get_ref(), cache.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/tour-segments/{id}/conflicts
pub async fn segment_conflicts(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let report = TourService::conflicts(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// POST /api/tour-segments/{id}/state-ranges
pub async fn add_state_range(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<StateRangeDraft>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let segment = TourService::add_range(
        pool.get_ref(),
        cache.get_ref(),
        &user,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(segment))
}

/// PUT /api/tour-segments/{id}/state-ranges/{range_id}
pub async fn update_state_range(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<StateRangeDraft>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let (id, range_id) = path.into_inner();
    let segment = TourService::update_range(
        pool.get_ref(),
        cache.get_ref(),
        &user,
        id,
        range_id,
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(segment))
}

/// DELETE /api/tour-segments/{id}/state-ranges/{range_id}
pub async fn remove_state_range(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let (id, range_id) = path.into_inner();
    let segment =
        TourService::remove_range(pool.get_ref(), cache.get_ref(), &user, id, range_id).await?;
    Ok(HttpResponse::Ok().json(segment))
}

/// GET /api/tours/passing-through
/// Public: hosts look for artists coming through their state
pub async fn passing_through(
    pool: web::Data<PgPool>,
    query: web::Query<PassingThroughQuery>,
) -> Result<impl Responder, MarketplaceError> {
    let ranges = TourService::passing_through(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ranges))
}

/// Configuration for tour routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tour-segments")
            .route("", web::get().to(list_segments))
            .route("", web::post().to(create_segment))
            .route("/{id}", web::get().to(get_segment))
            .route("/{id}", web::put().to(replace_segment))
            .route("/{id}", web::delete().to(delete_segment))
            .route("/{id}/conflicts", web::get().to(segment_conflicts))
            .route("/{id}/state-ranges", web::post().to(add_state_range))
            .route("/{id}/state-ranges/{range_id}", web::put().to(update_state_range))
            .route("/{id}/state-ranges/{range_id}", web::delete().to(remove_state_range)),
    )
    .route("/api/tours/passing-through", web::get().to(passing_through));
}
