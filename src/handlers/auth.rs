// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for registration, login and sessions
// PURPOSE: Also hosts the bearer/admin checks the other handlers call first

use crate::config::Config;
use crate::errors::MarketplaceError;
use crate::models::{LoginRequest, RegisterRequest, Role, User};
use crate::services::{AuthService, LoginRateLimiter};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get("Authorization")?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Resolve the signed-in user or fail with 401/403
pub async fn current_user(req: &HttpRequest, pool: &PgPool) -> Result<User, MarketplaceError> {
    let token = bearer_token(req).ok_or(MarketplaceError::Unauthorized)?;
    AuthService::authenticate(pool, token).await
}

/// Outcome of the X-Admin-Token header alone; None when the header is absent
fn check_admin_header(req: &HttpRequest, config: &Config) -> Option<Result<(), MarketplaceError>> {
    let token = req.headers().get("X-Admin-Token")?;
    match token.to_str() {
        Ok(token) if token == config.admin_token => Some(Ok(())),
        _ => {
            log::warn!("Admin request with invalid token");
            Some(Err(MarketplaceError::Forbidden))
        }
    }
}

/// Admin access: X-Admin-Token header or a session of an admin account
pub async fn verify_admin(
    req: &HttpRequest,
    pool: &PgPool,
    config: &Config,
) -> Result<(), MarketplaceError> {
    if let Some(result) = check_admin_header(req, config) {
        return result;
    }

    let user = current_user(req, pool).await.map_err(|e| {
        log::warn!("Admin request without valid credentials");
        e
    })?;
    if user.role != Role::Admin {
        log::warn!("Non-admin user {} attempted an admin request", user.id);
        return Err(MarketplaceError::Forbidden);
    }
    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let response = AuthService::register(pool.get_ref(), &config, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /api/auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<Arc<LoginRateLimiter>>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let response =
        AuthService::login(pool.get_ref(), &config, limiter.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/auth/logout
pub async fn logout(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, MarketplaceError> {
    let token = bearer_token(&req).ok_or(MarketplaceError::Unauthorized)?;
    AuthService::logout(pool.get_ref(), token).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/me
pub async fn me(pool: web::Data<PgPool>, req: HttpRequest) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(user.to_response()))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config_with_token(token: &str) -> Config {
        let mut config = Config::from_env();
        config.admin_token = token.to_string();
        config
    }

    #[actix_rt::test]
    async fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc123"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer   xyz "))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("xyz"));
    }

    #[actix_rt::test]
    async fn test_bearer_token_rejects_other_schemes() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        assert_eq!(bearer_token(&TestRequest::default().to_http_request()), None);
    }

    #[actix_rt::test]
    async fn test_admin_header() {
        let config = config_with_token("s3cret");

        let req = TestRequest::default()
            .insert_header(("X-Admin-Token", "s3cret"))
            .to_http_request();
        assert!(matches!(check_admin_header(&req, &config), Some(Ok(()))));

        let req = TestRequest::default()
            .insert_header(("X-Admin-Token", "guess"))
            .to_http_request();
        assert!(matches!(
            check_admin_header(&req, &config),
            Some(Err(MarketplaceError::Forbidden))
        ));

        assert!(check_admin_header(&TestRequest::default().to_http_request(), &config).is_none());
    }
}
