// src/models/tour.rs
// DOCUMENTATION: Tour segments and their state ranges
// PURPOSE: Persisted shapes plus the request DTOs used by the tour planner

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::services::tour_planner::CrossSegmentConflict;

/// A named collection of state-date ranges an artist plans to tour
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TourSegment {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Loaded separately from state_ranges, ordered by position
    #[sqlx(skip)]
    pub state_ranges: Vec<StateRange>,
}

/// A single state + date range + optional cities/notes within a tour segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StateRange {
    pub id: Uuid,
    pub segment_id: Uuid,
    /// USPS code, upper case
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cities: Vec<String>,
    pub notes: Option<String>,
    pub position: i32,
}

/// Editable form of a state range, as submitted by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRangeDraft {
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&StateRange> for StateRangeDraft {
    fn from(range: &StateRange) -> Self {
        StateRangeDraft {
            state: range.state.clone(),
            start_date: range.start_date,
            end_date: range.end_date,
            cities: range.cities.clone(),
            notes: range.notes.clone(),
        }
    }
}

/// Request DTO for POST /api/tour-segments and PUT /api/tour-segments/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourSegmentRequest {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub state_ranges: Vec<StateRangeDraft>,
}

/// A tour segment with its ranges and the cross-tour conflicts it has
#[derive(Debug, Serialize)]
pub struct TourSegmentResponse {
    #[serde(flatten)]
    pub segment: TourSegment,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    /// Overlaps with the artist's other tours; reported, never rejected
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<CrossSegmentConflict>,
}

impl TourSegment {
    pub fn to_response(self) -> TourSegmentResponse {
        let span = crate::services::tour_planner::tour_span(&self.state_ranges);
        TourSegmentResponse {
            starts_on: span.map(|(start, _)| start),
            ends_on: span.map(|(_, end)| end),
            conflicts: Vec::new(),
            segment: self,
        }
    }
}
