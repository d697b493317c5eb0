// src/handlers/profiles.rs
// DOCUMENTATION: HTTP handlers for artist, host and fan profiles
// PURPOSE: Public pages and search, plus updates of the caller's own profile

use super::auth::current_user;
use crate::errors::MarketplaceError;
use crate::models::{
    ArtistProfileInput, ArtistSearchQuery, FanProfileInput, HostProfileInput, HostSearchQuery, Role,
};
use crate::services::{require_role, us_states, ProfileCache, ProfileService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// GET /api/states
pub async fn list_states() -> impl Responder {
    HttpResponse::Ok().json(us_states::all())
}

/// GET /api/artists
pub async fn search_artists(
    pool: web::Data<PgPool>,
    query: web::Query<ArtistSearchQuery>,
) -> Result<impl Responder, MarketplaceError> {
    let result = ProfileService::search_artists(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/artists/{id}
pub async fn get_artist(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let page = ProfileService::public_artist(pool.get_ref(), cache.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// PUT /api/artists/me
pub async fn update_artist(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    body: web::Json<ArtistProfileInput>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    require_role(&user, Role::Artist)?;

    let profile =
        ProfileService::update_artist(pool.get_ref(), cache.get_ref(), &user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/hosts
pub async fn search_hosts(
    pool: web::Data<PgPool>,
    query: web::Query<HostSearchQuery>,
) -> Result<impl Responder, MarketplaceError> {
    let result = ProfileService::search_hosts(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/hosts/{id}
pub async fn get_host(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let page = ProfileService::public_host(pool.get_ref(), cache.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// PUT /api/hosts/me
pub async fn update_host(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ProfileCache>>,
    req: HttpRequest,
    body: web::Json<HostProfileInput>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    require_role(&user, Role::Host)?;

    let profile =
        ProfileService::update_host(pool.get_ref(), cache.get_ref(), &user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/fans/me
pub async fn get_fan(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    require_role(&user, Role::Fan)?;

    let profile = ProfileService::own_fan(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/fans/me
pub async fn update_fan(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<FanProfileInput>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    require_role(&user, Role::Fan)?;

    let profile = ProfileService::update_fan(pool.get_ref(), &user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Configuration for profile routes
/// DOCUMENTATION: `/me` is registered before `/{id}` so it is not parsed as a UUID
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/states", web::get().to(list_states))
        .service(
            web::scope("/api/artists")
                .route("", web::get().to(search_artists))
                .route("/me", web::put().to(update_artist))
                .route("/{id}", web::get().to(get_artist)),
        )
        .service(
            web::scope("/api/hosts")
                .route("", web::get().to(search_hosts))
                .route("/me", web::put().to(update_host))
                .route("/{id}", web::get().to(get_host)),
        )
        .route("/api/fans/me", web::get().to(get_fan))
        .route("/api/fans/me", web::put().to(update_fan));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_states_endpoint_lists_all_states() {
        let app = test::init_service(App::new().route("/api/states", web::get().to(list_states))).await;
        let req = test::TestRequest::get().uri("/api/states").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let states = body.as_array().unwrap();
        assert_eq!(states.len(), 51);
        assert!(states.iter().any(|s| s["code"] == "TX"));
    }
}
