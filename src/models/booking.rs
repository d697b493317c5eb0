// src/models/booking.rs
// DOCUMENTATION: Bookings between artists and hosts, and fan reservations
// PURPOSE: Booking status lifecycle and request/response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Booking lifecycle
/// DOCUMENTATION: pending -> accepted | declined | cancelled,
/// accepted -> completed | cancelled. Declined, cancelled and completed are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Accepted,
        BookingStatus::Declined,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Declined => "declined",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Declined)
                | (Pending, Cancelled)
                | (Accepted, Completed)
                | (Accepted, Cancelled)
        )
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            BookingStatus::Declined | BookingStatus::Cancelled | BookingStatus::Completed
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown booking status: {}", s))
    }
}

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub host_id: Uuid,
    pub requested_by: Uuid,
    pub event_date: NaiveDate,
    pub status: BookingStatus,
    pub includes_lodging: bool,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.artist_id == user_id || self.host_id == user_id
    }

    /// The other party of the booking, if `user_id` is one of them
    pub fn counterpart_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.artist_id {
            Some(self.host_id)
        } else if user_id == self.host_id {
            Some(self.artist_id)
        } else {
            None
        }
    }
}

/// Request DTO for POST /api/bookings
/// DOCUMENTATION: an artist names a host_id, a host names an artist_id
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub artist_id: Option<Uuid>,
    pub host_id: Option<Uuid>,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub includes_lodging: bool,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// Query parameters for GET /api/bookings
#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Action requested on POST /api/bookings/{id}/{action}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Accept,
    Decline,
    Cancel,
    Complete,
}

impl BookingAction {
    pub fn target_status(&self) -> BookingStatus {
        match self {
            BookingAction::Accept => BookingStatus::Accepted,
            BookingAction::Decline => BookingStatus::Declined,
            BookingAction::Cancel => BookingStatus::Cancelled,
            BookingAction::Complete => BookingStatus::Completed,
        }
    }
}

/// Fan seat reservation on an accepted booking
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub fan_id: Uuid,
    pub seats: i32,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for POST /api/bookings/{id}/reservations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1, max = 10))]
    pub seats: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        use BookingStatus::*;
        let allowed = [
            (Pending, Accepted),
            (Pending, Declined),
            (Pending, Cancelled),
            (Accepted, Completed),
            (Accepted, Cancelled),
        ];

        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_final_states_have_no_exits() {
        for from in BookingStatus::ALL.iter().filter(|s| s.is_final()) {
            assert!(BookingStatus::ALL.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn test_counterpart() {
        let artist = Uuid::new_v4();
        let host = Uuid::new_v4();
        let booking = Booking {
            id: Uuid::new_v4(),
            artist_id: artist,
            host_id: host,
            requested_by: artist,
            event_date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            status: BookingStatus::Pending,
            includes_lodging: false,
            message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(booking.counterpart_of(artist), Some(host));
        assert_eq!(booking.counterpart_of(host), Some(artist));
        assert_eq!(booking.counterpart_of(Uuid::new_v4()), None);
        assert!(booking.is_party(host));
    }

    #[test]
    fn test_status_query_deserializes() {
        let status: BookingStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, BookingStatus::Completed);
        assert_eq!("declined".parse::<BookingStatus>().unwrap(), BookingStatus::Declined);
        assert!("done".parse::<BookingStatus>().is_err());
    }
}
