// src/handlers/dashboard.rs
// DOCUMENTATION: Dashboard handler for the signed-in user

use super::auth::current_user;
use crate::errors::MarketplaceError;
use crate::services::DashboardService;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /api/dashboard
pub async fn dashboard(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let summary = DashboardService::for_user(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/dashboard", web::get().to(dashboard));
}
