// src/services/profile_service.rs
// DOCUMENTATION: Business logic for artist, host and fan profiles
// PURPOSE: Build public pages (cached), run marketplace searches, update own profile

use crate::db::{PhotoRepository, ProfileRepository, ReviewRepository, TourRepository, UserRepository};
use crate::errors::MarketplaceError;
use crate::models::{
    ApplicationStatus, ArtistProfile, ArtistProfileInput, ArtistSearchQuery, ArtistSummary,
    FanProfile, FanProfileInput, HostProfile, HostProfileInput, HostSearchQuery, PageParams,
    Paginated, PublicArtistProfile, PublicHostProfile, ReviewSummary, User,
};
use crate::services::registration::{validate_artist, validate_fan, validate_host};
use crate::services::{us_states, ProfileCache, ProfileKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ProfileService;

impl ProfileService {
    async fn cached<T: DeserializeOwned>(cache: &ProfileCache, key: &str) -> Option<T> {
        let raw = cache.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn store<T: Serialize>(cache: &ProfileCache, key: String, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => cache.set(key, raw).await,
            Err(e) => log::warn!("Could not cache {}: {}", key, e),
        }
    }

    /// GET /api/artists/{id}
    /// DOCUMENTATION: only approved, active artists are publicly visible
    pub async fn public_artist(
        pool: &PgPool,
        cache: &ProfileCache,
        user_id: Uuid,
    ) -> Result<PublicArtistProfile, MarketplaceError> {
        let key = ProfileCache::key(ProfileKind::Artist, user_id);
        if let Some(page) = Self::cached(cache, &key).await {
            return Ok(page);
        }

        let user = UserRepository::get_by_id(pool, user_id).await?;
        let profile = ProfileRepository::get_artist(pool, user_id).await?;
        if !user.is_active || profile.application_status != ApplicationStatus::Approved {
            return Err(MarketplaceError::NotFound(format!("Artist {}", user_id)));
        }

        let upcoming_tours = TourRepository::list_by_artist(pool, user_id, true).await?;
        let photos = PhotoRepository::get_photos_by_user(pool, user_id).await?;
        let reviews = ReviewRepository::get_reviews_by_subject(pool, user_id).await?;

        let page = PublicArtistProfile {
            user_id,
            display_name: user.display_name,
            stage_name: profile.stage_name,
            genres: profile.genres,
            bio: profile.bio,
            home_state: profile.home_state,
            home_city: profile.home_city,
            website: profile.website,
            spotify_artist_id: profile.spotify_artist_id,
            upcoming_tours,
            photos: photos.iter().map(|p| p.to_response()).collect(),
            reviews: ReviewSummary::from_reviews(&reviews),
        };

        Self::store(cache, key, &page).await;
        Ok(page)
    }

    /// GET /api/hosts/{id}
    pub async fn public_host(
        pool: &PgPool,
        cache: &ProfileCache,
        user_id: Uuid,
    ) -> Result<PublicHostProfile, MarketplaceError> {
        let key = ProfileCache::key(ProfileKind::Host, user_id);
        if let Some(page) = Self::cached(cache, &key).await {
            return Ok(page);
        }

        let user = UserRepository::get_by_id(pool, user_id).await?;
        if !user.is_active {
            return Err(MarketplaceError::NotFound(format!("Host {}", user_id)));
        }
        let profile = ProfileRepository::get_host(pool, user_id).await?;
        let photos = PhotoRepository::get_photos_by_user(pool, user_id).await?;
        let reviews = ReviewRepository::get_reviews_by_subject(pool, user_id).await?;

        let page = PublicHostProfile {
            user_id,
            display_name: user.display_name,
            profile,
            photos: photos.iter().map(|p| p.to_response()).collect(),
            reviews: ReviewSummary::from_reviews(&reviews),
        };

        Self::store(cache, key, &page).await;
        Ok(page)
    }

    pub async fn search_artists(
        pool: &PgPool,
        query: ArtistSearchQuery,
    ) -> Result<Paginated<ArtistSummary>, MarketplaceError> {
        let params = PageParams::new(query.page, query.limit);
        let state = us_states::normalize_optional(query.state.as_deref())?;
        let q = non_blank(query.q.as_deref());
        let genre = non_blank(query.genre.as_deref());

        let (artists, total) =
            ProfileRepository::search_artists(pool, q, genre, state.as_deref(), params).await?;
        Ok(Paginated::new(artists, total, params))
    }

    pub async fn search_hosts(
        pool: &PgPool,
        query: HostSearchQuery,
    ) -> Result<Paginated<HostProfile>, MarketplaceError> {
        let params = PageParams::new(query.page, query.limit);
        let state = us_states::normalize_optional(query.state.as_deref())?;
        if let Some(capacity) = query.min_capacity {
            if capacity < 1 {
                return Err(MarketplaceError::ValidationError(
                    "min_capacity must be at least 1".to_string(),
                ));
            }
        }

        let (hosts, total) =
            ProfileRepository::search_hosts(pool, &query, state.as_deref(), params).await?;
        Ok(Paginated::new(hosts, total, params))
    }

    pub async fn update_artist(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        input: ArtistProfileInput,
    ) -> Result<ArtistProfile, MarketplaceError> {
        let input = validate_artist(&input)?;
        let profile = ProfileRepository::update_artist(pool, user.id, &input).await?;
        cache.invalidate_user(user.id).await;
        Ok(profile)
    }

    pub async fn update_host(
        pool: &PgPool,
        cache: &ProfileCache,
        user: &User,
        input: HostProfileInput,
    ) -> Result<HostProfile, MarketplaceError> {
        let input = validate_host(&input)?;
        let profile = ProfileRepository::update_host(pool, user.id, &input).await?;
        cache.invalidate_user(user.id).await;
        Ok(profile)
    }

    pub async fn own_fan(pool: &PgPool, user: &User) -> Result<FanProfile, MarketplaceError> {
        ProfileRepository::get_fan(pool, user.id).await
    }

    pub async fn update_fan(
        pool: &PgPool,
        user: &User,
        input: FanProfileInput,
    ) -> Result<FanProfile, MarketplaceError> {
        let input = validate_fan(&input)?;
        ProfileRepository::update_fan(pool, user.id, &input).await
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  folk ")), Some("folk"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[tokio::test]
    async fn test_cached_page_round_trip() {
        let cache = ProfileCache::new(60);
        let summary = ReviewSummary {
            count: 2,
            average_rating: Some(4.5),
        };
        ProfileService::store(&cache, "artist:x".to_string(), &summary).await;

        let back: Option<ReviewSummary> = ProfileService::cached(&cache, "artist:x").await;
        assert_eq!(back, Some(summary));
    }

    #[test]
    fn test_empty_cache_is_a_miss() {
        let cache = ProfileCache::new(60);
        let back: Option<ReviewSummary> =
            tokio_test::block_on(ProfileService::cached(&cache, "artist:nobody"));
        assert!(back.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_cache_entry_is_a_miss() {
        let cache = ProfileCache::new(60);
        cache.set("host:y".to_string(), "not json".to_string()).await;

        let back: Option<ReviewSummary> = ProfileService::cached(&cache, "host:y").await;
        assert!(back.is_none());
    }
}
