// src/services/dashboard_service.rs
// DOCUMENTATION: Role-specific dashboard and marketplace-wide statistics

use crate::db::{BookingRepository, ProfileRepository, TourRepository, UserRepository};
use crate::errors::MarketplaceError;
use crate::models::{DashboardResponse, MarketplaceStats, Role, User};
use sqlx::PgPool;

pub struct DashboardService;

impl DashboardService {
    /// GET /api/dashboard
    pub async fn for_user(pool: &PgPool, user: &User) -> Result<DashboardResponse, MarketplaceError> {
        let mut dashboard = DashboardResponse {
            role: user.role,
            bookings_by_status: BookingRepository::count_by_status(pool, Some(user.id)).await?,
            next_booking: BookingRepository::next_upcoming(pool, user.id).await?,
            tour_segments: None,
            application_status: None,
            reservations: None,
        };

        match user.role {
            Role::Artist => {
                dashboard.tour_segments = Some(TourRepository::count(pool, Some(user.id)).await?);
                let profile = ProfileRepository::get_artist(pool, user.id).await?;
                dashboard.application_status = Some(profile.application_status);
            }
            Role::Fan => {
                dashboard.reservations =
                    Some(BookingRepository::count_reservations_for_fan(pool, user.id).await?);
            }
            Role::Host | Role::Admin => {}
        }

        Ok(dashboard)
    }

    /// GET /admin/stats
    pub async fn marketplace_stats(pool: &PgPool) -> Result<MarketplaceStats, MarketplaceError> {
        Ok(MarketplaceStats {
            users_by_role: UserRepository::count_by_role(pool).await?,
            bookings_by_status: BookingRepository::count_by_status(pool, None).await?,
            pending_applications: ProfileRepository::count_pending(pool).await?,
            tour_segments: TourRepository::count(pool, None).await?,
        })
    }
}
