// src/db/user_repository.rs
// DOCUMENTATION: User account database operations
// PURPOSE: Create accounts together with their role profile, look users up

use super::parse_column;
use crate::errors::MarketplaceError;
use crate::models::{ProfileInput, RegisterRequest, User};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Internal struct for mapping database rows to User
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    display_name: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, MarketplaceError> {
        Ok(User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            display_name: self.display_name,
            role: parse_column("role", &self.role)?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub struct UserRepository;

impl UserRepository {
    /// Insert a user and its role profile in one transaction
    /// DOCUMENTATION: `req` must already be validated; the email is stored as given
    pub async fn create_with_profile(
        pool: &PgPool,
        req: &RegisterRequest,
        password_hash: &str,
    ) -> Result<User, MarketplaceError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| MarketplaceError::from_db("Begin registration", e))?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash, display_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.account.email)
        .bind(password_hash)
        .bind(&req.account.display_name)
        .bind(req.account.role.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| MarketplaceError::from_db("Email", e))?;

        Self::insert_profile(&mut tx, row.id, &req.profile).await?;

        tx.commit()
            .await
            .map_err(|e| MarketplaceError::from_db("Commit registration", e))?;

        log::info!("Created {} account {}", req.account.role, row.id);
        row.into_user()
    }

    async fn insert_profile(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        profile: &ProfileInput,
    ) -> Result<(), MarketplaceError> {
        let result = match profile {
            ProfileInput::Artist(a) => {
                sqlx::query(
                    r#"
                    INSERT INTO artist_profiles (
                        user_id, stage_name, genres, bio, home_state, home_city,
                        website, spotify_artist_id
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(user_id)
                .bind(&a.stage_name)
                .bind(&a.genres)
                .bind(&a.bio)
                .bind(&a.home_state)
                .bind(&a.home_city)
                .bind(&a.website)
                .bind(&a.spotify_artist_id)
                .execute(&mut **tx)
                .await
            }
            ProfileInput::Host(h) => {
                sqlx::query(
                    r#"
                    INSERT INTO host_profiles (
                        user_id, venue_name, offers_venue, offers_lodging, capacity,
                        lodging_beds, city, state, description
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(user_id)
                .bind(&h.venue_name)
                .bind(h.offers_venue)
                .bind(h.offers_lodging)
                .bind(h.capacity)
                .bind(h.lodging_beds)
                .bind(&h.city)
                .bind(&h.state)
                .bind(&h.description)
                .execute(&mut **tx)
                .await
            }
            ProfileInput::Fan(f) => {
                sqlx::query(
                    r#"
                    INSERT INTO fan_profiles (user_id, home_state, favorite_genres)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(user_id)
                .bind(&f.home_state)
                .bind(&f.favorite_genres)
                .execute(&mut **tx)
                .await
            }
        };

        result.map_err(|e| MarketplaceError::from_db("Create profile", e))?;
        Ok(())
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<User, MarketplaceError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch user", e))?
            .ok_or_else(|| MarketplaceError::NotFound(format!("User {}", id)))?
            .into_user()
    }

    /// Lookup by lower-cased email; None when no account exists
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, MarketplaceError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(pool)
            .await
            .map_err(|e| MarketplaceError::from_db("Fetch user by email", e))?
            .map(UserRow::into_user)
            .transpose()
    }

    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<User, MarketplaceError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| MarketplaceError::from_db("Deactivate user", e))?
        .ok_or_else(|| MarketplaceError::NotFound(format!("User {}", id)))?;

        row.into_user()
    }

    pub async fn count_by_role(pool: &PgPool) -> Result<BTreeMap<String, i64>, MarketplaceError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role")
                .fetch_all(pool)
                .await
                .map_err(|e| MarketplaceError::from_db("Count users", e))?;

        Ok(rows.into_iter().collect())
    }
}
