// src/db/profile_repository.rs
// DOCUMENTATION: Artist, host and fan profile database operations
// PURPOSE: Profile reads/updates, marketplace search and artist applications

use super::parse_column;
use crate::errors::MarketplaceError;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct ArtistRow {
    user_id: Uuid,
    stage_name: String,
    genres: Vec<String>,
    bio: Option<String>,
    home_state: Option<String>,
    home_city: Option<String>,
    website: Option<String>,
    spotify_artist_id: Option<String>,
    application_status: String,
    reviewed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl ArtistRow {
    fn into_profile(self) -> Result<ArtistProfile, MarketplaceError> {
        Ok(ArtistProfile {
            user_id: self.user_id,
            stage_name: self.stage_name,
            genres: self.genres,
            bio: self.bio,
            home_state: self.home_state,
            home_city: self.home_city,
            website: self.website,
            spotify_artist_id: self.spotify_artist_id,
            application_status: parse_column("application_status", &self.application_status)?,
            reviewed_at: self.reviewed_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct FanRow {
    user_id: Uuid,
    home_state: Option<String>,
    favorite_genres: Vec<String>,
    subscription_tier: String,
    updated_at: DateTime<Utc>,
}

impl FanRow {
    fn into_profile(self) -> Result<FanProfile, MarketplaceError> {
        Ok(FanProfile {
            user_id: self.user_id,
            home_state: self.home_state,
            favorite_genres: self.favorite_genres,
            subscription_tier: parse_column("subscription_tier", &self.subscription_tier)?,
            updated_at: self.updated_at,
        })
    }
}

/// Shared WHERE clause for artist search ($1 = q, $2 = genre, $3 = state)
const ARTIST_SEARCH_FILTER: &str = r#"
    ap.application_status = 'approved'
    AND u.is_active
    AND ($1::text IS NULL OR ap.stage_name ILIKE '%' || $1 || '%')
    AND ($2::text IS NULL OR EXISTS (
        SELECT 1 FROM unnest(ap.genres) AS g WHERE lower(g) = lower($2)
    ))
    AND ($3::text IS NULL OR ap.home_state = $3 OR EXISTS (
        SELECT 1 FROM state_ranges sr
        JOIN tour_segments ts ON ts.id = sr.segment_id
        WHERE ts.artist_id = ap.user_id AND sr.state = $3 AND sr.end_date >= CURRENT_DATE
    ))
"#;

/// Shared WHERE clause for host search ($1 = state, $2 = city, $3 = lodging, $4 = capacity)
const HOST_SEARCH_FILTER: &str = r#"
    u.is_active
    AND ($1::text IS NULL OR hp.state = $1)
    AND ($2::text IS NULL OR lower(hp.city) = lower($2))
    AND ($3::bool IS NULL OR hp.offers_lodging = $3)
    AND ($4::int IS NULL OR (hp.offers_venue AND hp.capacity >= $4))
"#;

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn get_artist(pool: &PgPool, user_id: Uuid) -> Result<ArtistProfile, MarketplaceError> {
        sqlx::query_as::<_, ArtistRow>("SELECT * FROM artist_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch artist profile", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Artist {}", user_id)))?
            .into_profile()
    }

    pub async fn update_artist(
        pool: &PgPool,
        user_id: Uuid,
        input: &ArtistProfileInput,
    ) -> Result<ArtistProfile, MarketplaceError> {
        sqlx::query_as::<_, ArtistRow>(
            r#"
            UPDATE artist_profiles SET
                stage_name = $2, genres = $3, bio = $4, home_state = $5,
                home_city = $6, website = $7, spotify_artist_id = $8,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.stage_name)
        .bind(&input.genres)
        .bind(&input.bio)
        .bind(&input.home_state)
        .bind(&input.home_city)
        .bind(&input.website)
        .bind(&input.spotify_artist_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Update artist profile", e))?
        .ok_or_else(|| MarketplaceError::NotFound(format!("Artist {}", user_id)))?
        .into_profile()
    }

    pub async fn get_host(pool: &PgPool, user_id: Uuid) -> Result<HostProfile, MarketplaceError> {
        sqlx::query_as::<_, HostProfile>("SELECT * FROM host_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch host profile", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Host {}", user_id)))
    }

    pub async fn update_host(
        pool: &PgPool,
        user_id: Uuid,
        input: &HostProfileInput,
    ) -> Result<HostProfile, MarketplaceError> {
        sqlx::query_as::<_, HostProfile>(
            r#"
            UPDATE host_profiles SET
                venue_name = $2, offers_venue = $3, offers_lodging = $4,
                capacity = $5, lodging_beds = $6, city = $7, state = $8,
                description = $9, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.venue_name)
        .bind(input.offers_venue)
        .bind(input.offers_lodging)
        .bind(input.capacity)
        .bind(input.lodging_beds)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.description)
        .fetch_optional(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Update host profile", e))?
        .ok_or_else(|| MarketplaceError::NotFound(format!("Host {}", user_id)))
    }

    pub async fn get_fan(pool: &PgPool, user_id: Uuid) -> Result<FanProfile, MarketplaceError> {
        sqlx::query_as::<_, FanRow>("SELECT * FROM fan_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch fan profile", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Fan {}", user_id)))?
            .into_profile()
    }

    pub async fn update_fan(
        pool: &PgPool,
        user_id: Uuid,
        input: &FanProfileInput,
    ) -> Result<FanProfile, MarketplaceError> {
        sqlx::query_as::<_, FanRow>(
            r#"
            UPDATE fan_profiles SET
                home_state = $2, favorite_genres = $3, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.home_state)
        .bind(&input.favorite_genres)
        .fetch_optional(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Update fan profile", e))?
        .ok_or_else(|| MarketplaceError::NotFound(format!("Fan {}", user_id)))?
        .into_profile()
    }

    /// Search approved artists
    /// DOCUMENTATION: returns the page plus the total match count
    pub async fn search_artists(
        pool: &PgPool,
        q: Option<&str>,
        genre: Option<&str>,
        state: Option<&str>,
        params: PageParams,
    ) -> Result<(Vec<ArtistSummary>, i64), MarketplaceError> {
        let list_sql = format!(
            r#"
            SELECT ap.user_id, ap.stage_name, ap.genres, ap.home_state, ap.home_city
            FROM artist_profiles ap
            JOIN users u ON u.id = ap.user_id
            WHERE {}
            ORDER BY ap.stage_name
            LIMIT $4 OFFSET $5
            "#,
            ARTIST_SEARCH_FILTER
        );
        let artists = sqlx::query_as::<_, ArtistSummary>(&list_sql)
            .bind(q)
            .bind(genre)
            .bind(state)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Search artists", e))?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM artist_profiles ap JOIN users u ON u.id = ap.user_id WHERE {}",
            ARTIST_SEARCH_FILTER
        );
        let total: (i64,) = sqlx::query_as(&count_sql)
            .bind(q)
            .bind(genre)
            .bind(state)
            .fetch_one(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Count artists", e))?;

        Ok((artists, total.0))
    }

    pub async fn search_hosts(
        pool: &PgPool,
        query: &HostSearchQuery,
        state: Option<&str>,
        params: PageParams,
    ) -> Result<(Vec<HostProfile>, i64), MarketplaceError> {
        let list_sql = format!(
            r#"
            SELECT hp.*
            FROM host_profiles hp
            JOIN users u ON u.id = hp.user_id
            WHERE {}
            ORDER BY hp.city, hp.venue_name
            LIMIT $5 OFFSET $6
            "#,
            HOST_SEARCH_FILTER
        );
        let city = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let hosts = sqlx::query_as::<_, HostProfile>(&list_sql)
            .bind(state)
            .bind(city)
            .bind(query.offers_lodging)
            .bind(query.min_capacity)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Search hosts", e))?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM host_profiles hp JOIN users u ON u.id = hp.user_id WHERE {}",
            HOST_SEARCH_FILTER
        );
        let total: (i64,) = sqlx::query_as(&count_sql)
            .bind(state)
            .bind(city)
            .bind(query.offers_lodging)
            .bind(query.min_capacity)
            .fetch_one(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Count hosts", e))?;

        Ok((hosts, total.0))
    }

    /// Oldest applications first
    pub async fn list_pending_artists(pool: &PgPool) -> Result<Vec<ArtistProfile>, MarketplaceError> {
        let rows = sqlx::query_as::<_, ArtistRow>(
            r#"
            SELECT * FROM artist_profiles
            WHERE application_status = 'pending'
            ORDER BY updated_at
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("List pending artists", e))?;

        rows.into_iter().map(ArtistRow::into_profile).collect()
    }

    /// Move an application out of pending
    pub async fn decide_application(
        pool: &PgPool,
        user_id: Uuid,
        decision: ApplicationStatus,
    ) -> Result<ArtistProfile, MarketplaceError> {
        let updated = sqlx::query_as::<_, ArtistRow>(
            r#"
            UPDATE artist_profiles
            SET application_status = $2, reviewed_at = NOW(), updated_at = NOW()
            WHERE user_id = $1 AND application_status = 'pending'
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(decision.as_str())
        .fetch_optional(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Decide application", e))?;

        match updated {
            Some(row) => row.into_profile(),
            None => {
                // Distinguish a missing artist from one already decided
                let current = Self::get_artist(pool, user_id).await?;
                Err(MarketplaceError::InvalidTransition(format!(
                    "Application is already {}",
                    current.application_status.as_str()
                )))
            }
        }
    }

    pub async fn count_pending(pool: &PgPool) -> Result<i64, MarketplaceError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM artist_profiles WHERE application_status = 'pending'",
        )
        .fetch_one(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Count pending artists", e))?;

        Ok(count.0)
    }
}
