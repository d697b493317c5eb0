// src/handlers/bookings.rs
// DOCUMENTATION: HTTP handlers for bookings and fan reservations

use super::auth::current_user;
use crate::errors::MarketplaceError;
use crate::models::{BookingAction, BookingQuery, CreateBookingRequest, CreateReservationRequest};
use crate::services::BookingService;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// Map the last path segment of POST /api/bookings/{id}/{action}
fn parse_action(action: &str) -> Result<BookingAction, MarketplaceError> {
    match action {
        "accept" => Ok(BookingAction::Accept),
        "decline" => Ok(BookingAction::Decline),
        "cancel" => Ok(BookingAction::Cancel),
        "complete" => Ok(BookingAction::Complete),
        other => Err(MarketplaceError::NotFound(format!("Booking action '{}'", other))),
    }
}

/// POST /api/bookings
pub async fn create_booking(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<CreateBookingRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let booking = BookingService::create(pool.get_ref(), &user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// GET /api/bookings
pub async fn list_bookings(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<BookingQuery>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let page = BookingService::list_mine(pool.get_ref(), &user, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let booking = BookingService::get(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// POST /api/bookings/{id}/{accept|decline|cancel|complete}
pub async fn transition_booking(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<(Uuid, String)>,
) -> Result<impl Responder, MarketplaceError> {
    let (id, action) = path.into_inner();
    let action = parse_action(&action)?;
    let user = current_user(&req, pool.get_ref()).await?;

    let booking = BookingService::transition(pool.get_ref(), &user, id, action).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// POST /api/bookings/{id}/reservations
pub async fn create_reservation(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<CreateReservationRequest>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    let reservation =
        BookingService::reserve(pool.get_ref(), &user, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(reservation))
}

/// DELETE /api/bookings/{id}/reservations
pub async fn cancel_reservation(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, MarketplaceError> {
    let user = current_user(&req, pool.get_ref()).await?;
    BookingService::cancel_reservation(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for booking routes
/// DOCUMENTATION: `/reservations` is registered before the `{action}` catch-all
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/reservations", web::post().to(create_reservation))
            .route("/{id}/reservations", web::delete().to(cancel_reservation))
            .route("/{id}/{action}", web::post().to(transition_booking)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("accept").unwrap(), BookingAction::Accept);
        assert_eq!(parse_action("decline").unwrap(), BookingAction::Decline);
        assert_eq!(parse_action("cancel").unwrap(), BookingAction::Cancel);
        assert_eq!(parse_action("complete").unwrap(), BookingAction::Complete);
        assert!(matches!(
            parse_action("approve"),
            Err(MarketplaceError::NotFound(_))
        ));
    }
}
