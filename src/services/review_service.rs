// src/services/review_service.rs
// DOCUMENTATION: Reviews between the two parties of a completed booking

use crate::db::{BookingRepository, ReviewRepository, UserRepository};
use crate::errors::MarketplaceError;
use crate::models::{
    Booking, BookingStatus, CreateReviewRequest, Review, ReviewListResponse, ReviewSummary, User,
};
use crate::services::ProfileCache;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// The user `author` reviews on `booking`
fn review_subject(booking: &Booking, author: Uuid) -> Result<Uuid, MarketplaceError> {
    let subject = booking.counterpart_of(author).ok_or(MarketplaceError::Forbidden)?;
    if booking.status != BookingStatus::Completed {
        return Err(MarketplaceError::InvalidTransition(
            "Only completed bookings can be reviewed".to_string(),
        ));
    }
    Ok(subject)
}

pub struct ReviewService;

impl ReviewService {
    /// POST /api/reviews
    pub async fn create(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        req: CreateReviewRequest,
    ) -> Result<Review, MarketplaceError> {
        req.validate()?;
        let booking = BookingRepository::get(pool, req.booking_id).await?;
        let subject = review_subject(&booking, user.id)?;

        let comment = req.comment.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let review =
            ReviewRepository::create_review(pool, booking.id, user.id, subject, req.rating, comment)
                .await?;

        cache.invalidate_user(subject).await;
        log::info!("Review {} left on booking {}", review.id, booking.id);
        Ok(review)
    }

    /// GET /api/users/{id}/reviews
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<ReviewListResponse, MarketplaceError> {
        // 404 for unknown users rather than an empty list
        UserRepository::get_by_id(pool, user_id).await?;
        let reviews = ReviewRepository::get_reviews_by_subject(pool, user_id).await?;

        Ok(ReviewListResponse {
            summary: ReviewSummary::from_reviews(&reviews),
            reviews,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn booking(status: BookingStatus) -> Booking {
        let artist_id = Uuid::new_v4();
        Booking {
            id: Uuid::new_v4(),
            artist_id,
            host_id: Uuid::new_v4(),
            requested_by: artist_id,
            event_date: NaiveDate::from_ymd_opt(2031, 3, 1).unwrap(),
            status,
            includes_lodging: true,
            message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subject_is_the_other_party() {
        let b = booking(BookingStatus::Completed);
        assert_eq!(review_subject(&b, b.artist_id).unwrap(), b.host_id);
        assert_eq!(review_subject(&b, b.host_id).unwrap(), b.artist_id);
    }

    #[test]
    fn test_outsider_cannot_review() {
        let b = booking(BookingStatus::Completed);
        assert!(matches!(
            review_subject(&b, Uuid::new_v4()),
            Err(MarketplaceError::Forbidden)
        ));
    }

    #[test]
    fn test_booking_must_be_completed() {
        for status in [BookingStatus::Pending, BookingStatus::Accepted, BookingStatus::Cancelled] {
            let b = booking(status);
            assert!(matches!(
                review_subject(&b, b.artist_id),
                Err(MarketplaceError::InvalidTransition(_))
            ));
        }
    }
}
