// src/services/booking_service.rs
// DOCUMENTATION: Business logic for bookings and fan reservations
// PURPOSE: Enforce who may create and move a booking through its lifecycle

use crate::db::{BookingRepository, NewBooking, ProfileRepository, UserRepository};
use crate::errors::MarketplaceError;
use crate::models::{
    ApplicationStatus, Booking, BookingAction, BookingQuery, BookingStatus, CreateBookingRequest,
    CreateReservationRequest, PageParams, Paginated, Reservation, Role, User,
};
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Resolve (artist_id, host_id) for a booking request made by `user`
fn booking_parties(user: &User, req: &CreateBookingRequest) -> Result<(Uuid, Uuid), MarketplaceError> {
    match user.role {
        Role::Artist => {
            if req.artist_id.is_some_and(|id| id != user.id) {
                return Err(MarketplaceError::Forbidden);
            }
            let host_id = req.host_id.ok_or_else(|| {
                MarketplaceError::ValidationError("host_id is required".to_string())
            })?;
            Ok((user.id, host_id))
        }
        Role::Host => {
            if req.host_id.is_some_and(|id| id != user.id) {
                return Err(MarketplaceError::Forbidden);
            }
            let artist_id = req.artist_id.ok_or_else(|| {
                MarketplaceError::ValidationError("artist_id is required".to_string())
            })?;
            Ok((artist_id, user.id))
        }
        Role::Fan | Role::Admin => Err(MarketplaceError::Forbidden),
    }
}

/// The other side of an artist's request must be an active host account
fn ensure_bookable_host(host_user: &User) -> Result<(), MarketplaceError> {
    if host_user.role == Role::Host && host_user.is_active {
        Ok(())
    } else {
        Err(MarketplaceError::NotFound(format!("Host {}", host_user.id)))
    }
}

/// Check that `actor` may apply `action` to `booking` on `today`; returns the new status
pub fn authorize_transition(
    booking: &Booking,
    actor: Uuid,
    action: BookingAction,
    today: NaiveDate,
) -> Result<BookingStatus, MarketplaceError> {
    if !booking.is_party(actor) {
        return Err(MarketplaceError::Forbidden);
    }

    if booking.status.is_final() {
        return Err(MarketplaceError::InvalidTransition(format!(
            "Booking is already {}",
            booking.status
        )));
    }

    let target = action.target_status();
    if !booking.status.can_transition_to(target) {
        return Err(MarketplaceError::InvalidTransition(format!(
            "Cannot move a {} booking to {}",
            booking.status, target
        )));
    }

    match action {
        BookingAction::Accept | BookingAction::Decline if actor == booking.requested_by => {
            Err(MarketplaceError::Forbidden)
        }
        BookingAction::Complete if booking.event_date >= today => {
            Err(MarketplaceError::InvalidTransition(format!(
                "The event on {} has not happened yet",
                booking.event_date
            )))
        }
        _ => Ok(target),
    }
}

pub struct BookingService;

impl BookingService {
    /// POST /api/bookings
    pub async fn create(
        pool: &PgPool,
        user: &User,
        req: CreateBookingRequest,
    ) -> Result<Booking, MarketplaceError> {
        req.validate()?;
        let (artist_id, host_id) = booking_parties(user, &req)?;

        let today = Utc::now().date_naive();
        if req.event_date <= today {
            return Err(MarketplaceError::ValidationError(
                "Event date must be in the future".to_string(),
            ));
        }

        let artist = ProfileRepository::get_artist(pool, artist_id).await?;
        if artist.application_status != ApplicationStatus::Approved {
            return Err(if artist_id == user.id {
                MarketplaceError::Forbidden
            } else {
                MarketplaceError::NotFound(format!("Artist {}", artist_id))
            });
        }

        let host_user = UserRepository::get_by_id(pool, host_id).await?;
        ensure_bookable_host(&host_user)?;
        let host = ProfileRepository::get_host(pool, host_id).await?;
        if req.includes_lodging && !host.offers_lodging {
            return Err(MarketplaceError::ValidationError(
                "This host does not offer lodging".to_string(),
            ));
        }
        if !host.offers_venue && !req.includes_lodging {
            return Err(MarketplaceError::ValidationError(
                "This host only offers lodging; set includes_lodging".to_string(),
            ));
        }

        if BookingRepository::host_date_taken(pool, host_id, req.event_date).await? {
            return Err(MarketplaceError::Conflict(format!(
                "Host already has an open booking on {}",
                req.event_date
            )));
        }

        let booking = BookingRepository::create(
            pool,
            &NewBooking {
                artist_id,
                host_id,
                requested_by: user.id,
                event_date: req.event_date,
                includes_lodging: req.includes_lodging,
                message: req.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
            },
        )
        .await?;

        log::info!(
            "Booking {} requested by {} for {}",
            booking.id,
            user.id,
            booking.event_date
        );
        Ok(booking)
    }

    /// GET /api/bookings
    pub async fn list_mine(
        pool: &PgPool,
        user: &User,
        query: BookingQuery,
    ) -> Result<Paginated<Booking>, MarketplaceError> {
        let params = PageParams::new(query.page, query.limit);
        let (bookings, total) =
            BookingRepository::list_for_user(pool, user.id, query.status, params).await?;
        Ok(Paginated::new(bookings, total, params))
    }

    /// GET /api/bookings/{id}
    pub async fn get(pool: &PgPool, user: &User, id: Uuid) -> Result<Booking, MarketplaceError> {
        let booking = BookingRepository::get(pool, id).await?;
        if booking.is_party(user.id) || user.role == Role::Admin {
            Ok(booking)
        } else {
            Err(MarketplaceError::Forbidden)
        }
    }

    /// POST /api/bookings/{id}/{action}
    pub async fn transition(
        pool: &PgPool,
        user: &User,
        id: Uuid,
        action: BookingAction,
    ) -> Result<Booking, MarketplaceError> {
        let booking = BookingRepository::get(pool, id).await?;
        let target = authorize_transition(&booking, user.id, action, Utc::now().date_naive())?;

        let updated = BookingRepository::update_status(pool, id, booking.status, target).await?;
        log::info!(
            "Booking {} moved {} -> {} by {}",
            id,
            booking.status,
            updated.status,
            user.id
        );
        Ok(updated)
    }

    /// POST /api/bookings/{id}/reservations
    pub async fn reserve(
        pool: &PgPool,
        user: &User,
        booking_id: Uuid,
        req: CreateReservationRequest,
    ) -> Result<Reservation, MarketplaceError> {
        if user.role != Role::Fan {
            return Err(MarketplaceError::Forbidden);
        }
        req.validate()?;

        let booking = BookingRepository::get(pool, booking_id).await?;
        if booking.event_date < Utc::now().date_naive() {
            return Err(MarketplaceError::Conflict("This concert is over".to_string()));
        }

        let host = ProfileRepository::get_host(pool, booking.host_id).await?;
        let capacity = match (host.offers_venue, host.capacity) {
            (true, Some(capacity)) => capacity,
            _ => {
                return Err(MarketplaceError::Conflict(
                    "This concert has no venue seating".to_string(),
                ))
            }
        };

        let reservation =
            BookingRepository::create_reservation(pool, booking_id, user.id, req.seats, capacity)
                .await?;
        log::info!(
            "Fan {} reserved {} seats for booking {}",
            user.id,
            reservation.seats,
            booking_id
        );
        Ok(reservation)
    }

    /// DELETE /api/bookings/{id}/reservations
    pub async fn cancel_reservation(
        pool: &PgPool,
        user: &User,
        booking_id: Uuid,
    ) -> Result<(), MarketplaceError> {
        if user.role != Role::Fan {
            return Err(MarketplaceError::Forbidden);
        }
        BookingRepository::delete_reservation(pool, booking_id, user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2031, m, d).unwrap()
    }

    fn booking(status: BookingStatus, requested_by_artist: bool) -> Booking {
        let artist_id = Uuid::new_v4();
        let host_id = Uuid::new_v4();
        Booking {
            id: Uuid::new_v4(),
            artist_id,
            host_id,
            requested_by: if requested_by_artist { artist_id } else { host_id },
            event_date: date(7, 4),
            status,
            includes_lodging: false,
            message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "x@example.com".to_string(),
            password_hash: String::new(),
            display_name: "X".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(artist_id: Option<Uuid>, host_id: Option<Uuid>) -> CreateBookingRequest {
        CreateBookingRequest {
            artist_id,
            host_id,
            event_date: date(7, 4),
            includes_lodging: false,
            message: None,
        }
    }

    #[test]
    fn test_counterpart_accepts() {
        let b = booking(BookingStatus::Pending, true);
        let status = authorize_transition(&b, b.host_id, BookingAction::Accept, date(6, 1)).unwrap();
        assert_eq!(status, BookingStatus::Accepted);
    }

    #[test]
    fn test_requester_cannot_accept_or_decline() {
        let b = booking(BookingStatus::Pending, true);
        for action in [BookingAction::Accept, BookingAction::Decline] {
            let err = authorize_transition(&b, b.artist_id, action, date(6, 1)).unwrap_err();
            assert!(matches!(err, MarketplaceError::Forbidden));
        }
    }

    #[test]
    fn test_either_party_cancels() {
        let b = booking(BookingStatus::Accepted, false);
        assert!(authorize_transition(&b, b.artist_id, BookingAction::Cancel, date(6, 1)).is_ok());
        assert!(authorize_transition(&b, b.host_id, BookingAction::Cancel, date(6, 1)).is_ok());
    }

    #[test]
    fn test_outsider_forbidden() {
        let b = booking(BookingStatus::Pending, true);
        let err =
            authorize_transition(&b, Uuid::new_v4(), BookingAction::Cancel, date(6, 1)).unwrap_err();
        assert!(matches!(err, MarketplaceError::Forbidden));
    }

    #[test]
    fn test_complete_only_after_event_date() {
        let b = booking(BookingStatus::Accepted, true);
        let err = authorize_transition(&b, b.host_id, BookingAction::Complete, date(7, 4)).unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidTransition(_)));

        let status =
            authorize_transition(&b, b.artist_id, BookingAction::Complete, date(7, 5)).unwrap();
        assert_eq!(status, BookingStatus::Completed);
    }

    #[test]
    fn test_final_status_rejects_actions() {
        let b = booking(BookingStatus::Declined, true);
        for action in [
            BookingAction::Accept,
            BookingAction::Decline,
            BookingAction::Cancel,
            BookingAction::Complete,
        ] {
            let err = authorize_transition(&b, b.host_id, action, date(8, 1)).unwrap_err();
            assert!(matches!(err, MarketplaceError::InvalidTransition(_)));
        }
    }

    #[test]
    fn test_pending_cannot_complete() {
        let b = booking(BookingStatus::Pending, true);
        let err = authorize_transition(&b, b.host_id, BookingAction::Complete, date(8, 1)).unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidTransition(_)));
    }

    #[test]
    fn test_booking_parties_by_role() {
        let artist = user(Role::Artist);
        let host_id = Uuid::new_v4();
        assert_eq!(
            booking_parties(&artist, &request(None, Some(host_id))).unwrap(),
            (artist.id, host_id)
        );

        let host = user(Role::Host);
        let artist_id = Uuid::new_v4();
        assert_eq!(
            booking_parties(&host, &request(Some(artist_id), None)).unwrap(),
            (artist_id, host.id)
        );
    }

    #[test]
    fn test_booking_parties_rejects_other_roles_and_impersonation() {
        assert!(matches!(
            booking_parties(&user(Role::Fan), &request(Some(Uuid::new_v4()), Some(Uuid::new_v4()))),
            Err(MarketplaceError::Forbidden)
        ));

        let artist = user(Role::Artist);
        assert!(matches!(
            booking_parties(&artist, &request(Some(Uuid::new_v4()), Some(Uuid::new_v4()))),
            Err(MarketplaceError::Forbidden)
        ));
        assert!(matches!(
            booking_parties(&artist, &request(None, None)),
            Err(MarketplaceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_target_must_be_active_host() {
        assert!(ensure_bookable_host(&user(Role::Host)).is_ok());

        for role in [Role::Artist, Role::Fan, Role::Admin] {
            assert!(matches!(
                ensure_bookable_host(&user(role)),
                Err(MarketplaceError::NotFound(_))
            ));
        }

        let mut closed = user(Role::Host);
        closed.is_active = false;
        assert!(matches!(
            ensure_bookable_host(&closed),
            Err(MarketplaceError::NotFound(_))
        ));
    }
}
