// src/services/auth_service.rs
// DOCUMENTATION: Registration, login and bearer-token sessions
// PURPOSE: Passwords are hashed with argon2; only sha256(token) is persisted

use crate::config::Config;
use crate::db::{SessionRepository, UserRepository};
use crate::errors::MarketplaceError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
use crate::services::registration::validate_registration;
use crate::services::LoginRateLimiter;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use validator::Validate;

const TOKEN_BYTES: usize = 32;

pub fn hash_password(password: &str) -> Result<String, MarketplaceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Password hashing failed: {}", e);
            MarketplaceError::InternalError
        })
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Random bearer token, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub struct AuthService;

impl AuthService {
    /// Create an account with its role profile and open a first session
    pub async fn register(
        pool: &PgPool,
        config: &Config,
        req: RegisterRequest,
    ) -> Result<AuthResponse, MarketplaceError> {
        let req = validate_registration(&req)?;

        if UserRepository::find_by_email(pool, &req.account.email)
            .await?
            .is_some()
        {
            return Err(MarketplaceError::AlreadyExists(format!(
                "Account {}",
                req.account.email
            )));
        }

        let password_hash = hash_password(&req.account.password)?;
        let user = UserRepository::create_with_profile(pool, &req, &password_hash).await?;

        log::info!("Registered {} account {}", user.role, user.id);
        Self::open_session(pool, config, &user).await
    }

    /// Check credentials and open a session
    /// DOCUMENTATION: unknown email and wrong password return the same 401
    pub async fn login(
        pool: &PgPool,
        config: &Config,
        limiter: &LoginRateLimiter,
        req: LoginRequest,
    ) -> Result<AuthResponse, MarketplaceError> {
        req.validate()?;
        limiter.check(&req.email)?;

        let user = match UserRepository::find_by_email(pool, &req.email).await? {
            Some(user) if verify_password(&req.password, &user.password_hash) => user,
            _ => {
                log::warn!("Failed login for {}", req.email.trim().to_lowercase());
                return Err(MarketplaceError::Unauthorized);
            }
        };

        ensure_active(&user)?;
        Self::open_session(pool, config, &user).await
    }

    async fn open_session(
        pool: &PgPool,
        config: &Config,
        user: &User,
    ) -> Result<AuthResponse, MarketplaceError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(config.session_ttl_hours);
        SessionRepository::create(pool, &hash_token(&token), user.id, expires_at).await?;

        Ok(AuthResponse {
            token,
            expires_at,
            user: user.to_response(),
        })
    }

    pub async fn logout(pool: &PgPool, token: &str) -> Result<(), MarketplaceError> {
        SessionRepository::delete(pool, &hash_token(token)).await?;
        Ok(())
    }

    /// Resolve a bearer token to its active user
    pub async fn authenticate(pool: &PgPool, token: &str) -> Result<User, MarketplaceError> {
        let session = SessionRepository::find(pool, &hash_token(token))
            .await?
            .ok_or(MarketplaceError::Unauthorized)?;

        if session.is_expired(Utc::now()) {
            SessionRepository::delete(pool, &session.token_hash).await?;
            return Err(MarketplaceError::Unauthorized);
        }

        let user = UserRepository::get_by_id(pool, session.user_id)
            .await
            .map_err(|e| match e {
                MarketplaceError::NotFound(_) => MarketplaceError::Unauthorized,
                other => other,
            })?;

        ensure_active(&user)?;
        Ok(user)
    }
}

/// Start background task that deletes expired sessions
pub fn start_session_purge_task(pool: PgPool, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            match SessionRepository::delete_expired(&pool).await {
                Ok(0) => {}
                Ok(n) => log::info!("Purged {} expired sessions", n),
                Err(e) => log::error!("Session purge failed: {}", e),
            }
        }
    });
}

/// Deactivated accounts keep their sessions but every request is refused with 403
fn ensure_active(user: &User) -> Result<(), MarketplaceError> {
    if user.is_active {
        Ok(())
    } else {
        log::warn!("Request from deactivated account {}", user.id);
        Err(MarketplaceError::Forbidden)
    }
}

/// Fail with 403 unless `user` has `role`
pub fn require_role(user: &User, role: Role) -> Result<(), MarketplaceError> {
    if user.role == role {
        Ok(())
    } else {
        Err(MarketplaceError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("tourbus42").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("tourbus42", &hash));
        assert!(!verify_password("tourbus43", &hash));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    fn user(is_active: bool) -> User {
        User {
            id: uuid::Uuid::new_v4(),
            email: "fan@example.com".to_string(),
            password_hash: String::new(),
            display_name: "Fan".to_string(),
            role: Role::Fan,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_deactivated_account_is_forbidden() {
        assert!(ensure_active(&user(true)).is_ok());
        assert!(matches!(
            ensure_active(&user(false)),
            Err(MarketplaceError::Forbidden)
        ));
    }

    #[test]
    fn test_token_hash_is_stable_sha256() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
