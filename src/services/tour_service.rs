// src/services/tour_service.rs
// DOCUMENTATION: Business logic for tour segments
// PURPOSE: Every write goes through a TourForm so the in-memory rules
// (date order, one range per state, no overlaps) hold for persisted tours too

use crate::db::{ProfileRepository, TourRepository};
use crate::errors::MarketplaceError;
use crate::models::{
    ApplicationStatus, PassingThrough, PassingThroughQuery, Role, StateRangeDraft, TourSegment,
    TourSegmentRequest, TourSegmentResponse, User,
};
use crate::services::tour_planner::{
    cross_segment_conflicts, detect_conflicts, CrossSegmentConflict, RangeConflict, TourForm,
};
use crate::services::{us_states, ProfileCache};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// GET /api/tour-segments/{id}/conflicts
#[derive(Debug, Serialize)]
pub struct ConflictReport {
    pub segment_id: Uuid,
    /// Conflicts inside the segment (only possible for data written before validation)
    pub internal: Vec<RangeConflict>,
    pub cross_segment: Vec<CrossSegmentConflict>,
}

/// Only the owning artist may change a segment
fn ensure_owner(user: &User, segment: &TourSegment) -> Result<(), MarketplaceError> {
    if segment.artist_id == user.id {
        Ok(())
    } else {
        log::warn!("User {} tried to modify tour segment {}", user.id, segment.id);
        Err(MarketplaceError::Forbidden)
    }
}

fn ensure_artist(user: &User) -> Result<(), MarketplaceError> {
    if user.role == Role::Artist {
        Ok(())
    } else {
        Err(MarketplaceError::Forbidden)
    }
}

pub struct TourService;

impl TourService {
    async fn respond(
        pool: &PgPool,
        segment: TourSegment,
    ) -> Result<TourSegmentResponse, MarketplaceError> {
        let others = TourRepository::list_by_artist(pool, segment.artist_id, false).await?;
        let conflicts = cross_segment_conflicts(Some(segment.id), &segment.state_ranges, &others);
        let mut response = segment.to_response();
        response.conflicts = conflicts;
        Ok(response)
    }

    /// Persist `form` over an existing segment and drop the artist's cached page
    async fn save_form(
        pool: &PgPool,
        cache: &ProfileCache,
        segment: &TourSegment,
        form: TourForm,
    ) -> Result<TourSegmentResponse, MarketplaceError> {
        let submission = form.into_submission()?;
        let saved = TourRepository::replace_segment(pool, segment.id, &submission).await?;
        cache.invalidate_user(segment.artist_id).await;
        Self::respond(pool, saved).await
    }

    /// GET /api/tour-segments
    pub async fn list_mine(pool: &PgPool, user: &User) -> Result<Vec<TourSegmentResponse>, MarketplaceError> {
        ensure_artist(user)?;
        let segments = TourRepository::list_by_artist(pool, user.id, false).await?;

        Ok(segments
            .iter()
            .map(|segment| {
                let mut response = segment.clone().to_response();
                response.conflicts =
                    cross_segment_conflicts(Some(segment.id), &segment.state_ranges, &segments);
                response
            })
            .collect())
    }

    /// GET /api/tour-segments/{id}
    /// DOCUMENTATION: visible to the owner and admins, and to everyone once the artist is approved
    pub async fn get(pool: &PgPool, user: &User, id: Uuid) -> Result<TourSegmentResponse, MarketplaceError> {
        let segment = TourRepository::get_segment(pool, id).await?;
        if segment.artist_id != user.id && user.role != Role::Admin {
            let artist = ProfileRepository::get_artist(pool, segment.artist_id).await?;
            if artist.application_status != ApplicationStatus::Approved {
                return Err(MarketplaceError::NotFound(format!("Tour segment {}", id)));
            }
        }
        Self::respond(pool, segment).await
    }

    /// POST /api/tour-segments
    pub async fn create(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        req: TourSegmentRequest,
    ) -> Result<TourSegmentResponse, MarketplaceError> {
        ensure_artist(user)?;
        let form = TourForm::from_request(&req.name, req.notes.as_deref(), &req.state_ranges)?;
        let submission = form.into_submission()?;

        let segment = TourRepository::create_segment(pool, user.id, &submission).await?;
        cache.invalidate_user(user.id).await;
        Self::respond(pool, segment).await
    }

    /// PUT /api/tour-segments/{id}
    /// DOCUMENTATION: full replace. Ranges get fresh ids.
    pub async fn replace(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        id: Uuid,
        req: TourSegmentRequest,
    ) -> Result<TourSegmentResponse, MarketplaceError> {
        let segment = TourRepository::get_segment(pool, id).await?;
        ensure_owner(user, &segment)?;

        let form = TourForm::from_request(&req.name, req.notes.as_deref(), &req.state_ranges)?;
        Self::save_form(pool, cache, &segment, form).await
    }

    /// DELETE /api/tour-segments/{id}
    pub async fn delete(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        id: Uuid,
    ) -> Result<(), MarketplaceError> {
        let segment = TourRepository::get_segment(pool, id).await?;
        ensure_owner(user, &segment)?;

        TourRepository::delete_segment(pool, id).await?;
        cache.invalidate_user(segment.artist_id).await;
        log::info!("Deleted tour segment {}", id);
        Ok(())
    }

    /// POST /api/tour-segments/{id}/state-ranges
    pub async fn add_range(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        id: Uuid,
        draft: StateRangeDraft,
    ) -> Result<TourSegmentResponse, MarketplaceError> {
        let segment = TourRepository::get_segment(pool, id).await?;
        ensure_owner(user, &segment)?;

        let mut form = TourForm::from_segment(&segment);
        form.add_range(&draft)?;
        Self::save_form(pool, cache, &segment, form).await
    }

    /// PUT /api/tour-segments/{id}/state-ranges/{range_id}
    pub async fn update_range(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        id: Uuid,
        range_id: Uuid,
        draft: StateRangeDraft,
    ) -> Result<TourSegmentResponse, MarketplaceError> {
        let segment = TourRepository::get_segment(pool, id).await?;
        ensure_owner(user, &segment)?;

        let mut form = TourForm::from_segment(&segment);
        form.begin_edit(range_id)?;
        form.commit_edit(&draft)?;
        Self::save_form(pool, cache, &segment, form).await
    }

    /// DELETE /api/tour-segments/{id}/state-ranges/{range_id}
    /// DOCUMENTATION: the last range cannot be removed; delete the segment instead
    pub async fn remove_range(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        id: Uuid,
        range_id: Uuid,
    ) -> Result<TourSegmentResponse, MarketplaceError> {
        let segment = TourRepository::get_segment(pool, id).await?;
        ensure_owner(user, &segment)?;

        let mut form = TourForm::from_segment(&segment);
        form.remove_range(range_id)?;
        Self::save_form(pool, cache, &segment, form).await
    }

    /// GET /api/tour-segments/{id}/conflicts
    /// DOCUMENTATION: readable by the owner and admins
    pub async fn conflicts(pool: &PgPool, user: &User, id: Uuid) -> Result<ConflictReport, MarketplaceError> {
        let segment = TourRepository::get_segment(pool, id).await?;
        if user.role != Role::Admin {
            ensure_owner(user, &segment)?;
        }

        let others = TourRepository::list_by_artist(pool, segment.artist_id, false).await?;
        Ok(ConflictReport {
            segment_id: segment.id,
            internal: detect_conflicts(&segment.state_ranges),
            cross_segment: cross_segment_conflicts(Some(segment.id), &segment.state_ranges, &others),
        })
    }

    /// GET /api/tours/passing-through
    pub async fn passing_through(
        pool: &PgPool,
        query: PassingThroughQuery,
    ) -> Result<Vec<PassingThrough>, MarketplaceError> {
        let state = us_states::normalize(&query.state)?;
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(MarketplaceError::ValidationError(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }
        TourRepository::passing_through(pool, &state, query.from, query.to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            display_name: "Someone".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn segment_of(artist_id: Uuid) -> TourSegment {
        TourSegment {
            id: Uuid::new_v4(),
            artist_id,
            name: "Gulf Coast".to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            state_ranges: Vec::new(),
        }
    }

    #[test]
    fn test_only_owner_may_modify() {
        let artist = user(Role::Artist);
        let segment = segment_of(artist.id);
        assert!(ensure_owner(&artist, &segment).is_ok());
        assert!(matches!(
            ensure_owner(&user(Role::Admin), &segment),
            Err(MarketplaceError::Forbidden)
        ));
    }

    #[test]
    fn test_other_artist_forbidden() {
        let segment = segment_of(Uuid::new_v4());
        let err = ensure_owner(&user(Role::Artist), &segment).unwrap_err();
        assert!(matches!(err, MarketplaceError::Forbidden));
    }

    #[test]
    fn test_only_artists_plan_tours() {
        assert!(ensure_artist(&user(Role::Artist)).is_ok());
        assert!(ensure_artist(&user(Role::Host)).is_err());
        assert!(ensure_artist(&user(Role::Fan)).is_err());
    }
}
