// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Review left by one party of a completed booking about the other
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub author_id: Uuid,
    pub subject_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Aggregated rating for a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub count: i64,
    pub average_rating: Option<f64>,
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return ReviewSummary::default();
        }
        let total: i64 = reviews.iter().map(|r| r.rating as i64).sum();
        let count = reviews.len() as i64;
        // Rounded to two decimals for display
        let average = (total as f64 / count as f64 * 100.0).round() / 100.0;
        ReviewSummary {
            count,
            average_rating: Some(average),
        }
    }
}

/// Reviews about a user plus their summary
#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub summary: ReviewSummary,
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i16) -> Review {
        Review {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            rating,
            comment: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_average() {
        let summary = ReviewSummary::from_reviews(&[review(5), review(4), review(4)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average_rating, Some(4.33));
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(ReviewSummary::from_reviews(&[]), ReviewSummary::default());
    }

    #[test]
    fn test_rating_bounds() {
        let mut req = CreateReviewRequest {
            booking_id: Uuid::new_v4(),
            rating: 5,
            comment: Some("Great crowd".to_string()),
        };
        assert!(req.validate().is_ok());

        req.rating = 0;
        assert!(req.validate().is_err());

        req.rating = 6;
        assert!(req.validate().is_err());
    }
}
