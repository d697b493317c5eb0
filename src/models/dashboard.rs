// src/models/dashboard.rs
// DOCUMENTATION: Dashboard and admin statistics DTOs

use serde::Serialize;
use std::collections::BTreeMap;

use super::{ApplicationStatus, Booking, Role};

/// GET /api/dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub role: Role,
    /// Booking counts keyed by status name
    pub bookings_by_status: BTreeMap<String, i64>,
    pub next_booking: Option<Booking>,
    /// Artists only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_segments: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_status: Option<ApplicationStatus>,
    /// Fans only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations: Option<i64>,
}

/// GET /admin/stats
#[derive(Debug, Serialize)]
pub struct MarketplaceStats {
    pub users_by_role: BTreeMap<String, i64>,
    pub bookings_by_status: BTreeMap<String, i64>,
    pub pending_applications: i64,
    pub tour_segments: i64,
}
