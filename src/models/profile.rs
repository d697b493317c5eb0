// src/models/profile.rs
// DOCUMENTATION: Role-specific profile records and DTOs
// PURPOSE: Artist, host and fan profiles plus search and public views

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{PhotoResponse, ReviewSummary, TourSegment};

/// Artist application lifecycle (admins approve or reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {}", other)),
        }
    }
}

/// Fan subscription tier. Billing happens outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Supporter,
    Patron,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Supporter => "supporter",
            SubscriptionTier::Patron => "patron",
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionTier::Free),
            "supporter" => Ok(SubscriptionTier::Supporter),
            "patron" => Ok(SubscriptionTier::Patron),
            other => Err(format!("unknown subscription tier: {}", other)),
        }
    }
}

/// Artist profile as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub user_id: Uuid,
    pub stage_name: String,
    pub genres: Vec<String>,
    pub bio: Option<String>,
    pub home_state: Option<String>,
    pub home_city: Option<String>,
    pub website: Option<String>,
    pub spotify_artist_id: Option<String>,
    pub application_status: ApplicationStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Host profile as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HostProfile {
    pub user_id: Uuid,
    pub venue_name: Option<String>,
    pub offers_venue: bool,
    pub offers_lodging: bool,
    pub capacity: Option<i32>,
    pub lodging_beds: Option<i32>,
    pub city: String,
    pub state: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Fan profile as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanProfile {
    pub user_id: Uuid,
    pub home_state: Option<String>,
    pub favorite_genres: Vec<String>,
    pub subscription_tier: SubscriptionTier,
    pub updated_at: DateTime<Utc>,
}

/// Artist fields collected by the registration wizard and PUT /api/artists/me
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistProfileInput {
    pub stage_name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub home_state: Option<String>,
    #[serde(default)]
    pub home_city: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub spotify_artist_id: Option<String>,
}

/// Host fields collected by the registration wizard and PUT /api/hosts/me
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostProfileInput {
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub offers_venue: bool,
    #[serde(default)]
    pub offers_lodging: bool,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub lodging_beds: Option<i32>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fan fields collected by the registration wizard and PUT /api/fans/me
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FanProfileInput {
    #[serde(default)]
    pub home_state: Option<String>,
    #[serde(default)]
    pub favorite_genres: Vec<String>,
}

/// Role-tagged profile section of a registration payload
/// DOCUMENTATION: `{"kind": "artist", ...}` etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProfileInput {
    Artist(ArtistProfileInput),
    Host(HostProfileInput),
    Fan(FanProfileInput),
}

impl ProfileInput {
    pub fn role(&self) -> super::Role {
        match self {
            ProfileInput::Artist(_) => super::Role::Artist,
            ProfileInput::Host(_) => super::Role::Host,
            ProfileInput::Fan(_) => super::Role::Fan,
        }
    }
}

/// Query parameters for GET /api/artists
#[derive(Debug, Default, Deserialize)]
pub struct ArtistSearchQuery {
    /// Substring match on stage name
    pub q: Option<String>,
    pub genre: Option<String>,
    /// Home state or a state the artist is touring through
    pub state: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for GET /api/hosts
#[derive(Debug, Default, Deserialize)]
pub struct HostSearchQuery {
    pub state: Option<String>,
    pub city: Option<String>,
    pub offers_lodging: Option<bool>,
    pub min_capacity: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Listing entry for artist search
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArtistSummary {
    pub user_id: Uuid,
    pub stage_name: String,
    pub genres: Vec<String>,
    pub home_state: Option<String>,
    pub home_city: Option<String>,
}

/// Public artist page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicArtistProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub stage_name: String,
    pub genres: Vec<String>,
    pub bio: Option<String>,
    pub home_state: Option<String>,
    pub home_city: Option<String>,
    pub website: Option<String>,
    pub spotify_artist_id: Option<String>,
    pub upcoming_tours: Vec<TourSegment>,
    pub photos: Vec<PhotoResponse>,
    pub reviews: ReviewSummary,
}

/// Public host page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicHostProfile {
    pub user_id: Uuid,
    pub display_name: String,
    #[serde(flatten)]
    pub profile: HostProfile,
    pub photos: Vec<PhotoResponse>,
    pub reviews: ReviewSummary,
}

/// Ranges of approved artists passing through a state
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PassingThrough {
    pub artist_id: Uuid,
    pub stage_name: String,
    pub segment_id: Uuid,
    pub segment_name: String,
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cities: Vec<String>,
}

/// Query parameters for GET /api/tours/passing-through
#[derive(Debug, Deserialize)]
pub struct PassingThroughQuery {
    pub state: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_profile_input_tagged_by_kind() {
        let json = r#"{"kind":"host","city":"Austin","state":"tx","offers_lodging":true,"lodging_beds":2}"#;
        let input: ProfileInput = serde_json::from_str(json).unwrap();
        match &input {
            ProfileInput::Host(host) => {
                assert_eq!(host.city, "Austin");
                assert!(host.offers_lodging);
                assert!(!host.offers_venue);
                assert_eq!(host.lodging_beds, Some(2));
            }
            other => panic!("unexpected profile: {:?}", other),
        }
        assert_eq!(input.role(), Role::Host);
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("approved!".parse::<ApplicationStatus>().is_err());
        assert_eq!("patron".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Patron);
    }
}
