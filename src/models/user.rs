// src/models/user.rs
// DOCUMENTATION: User accounts, roles and session DTOs
// PURPOSE: Shared between auth handlers, services and repositories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Marketplace role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    Host,
    Fan,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Artist => "artist",
            Role::Host => "host",
            Role::Fan => "fan",
            Role::Admin => "admin",
        }
    }

    /// Roles a visitor may pick in the registration wizard
    pub fn is_self_registrable(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artist" => Ok(Role::Artist),
            "host" => Ok(Role::Host),
            "fan" => Ok(Role::Fan),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Represents a user record from the database
/// DOCUMENTATION: password_hash never leaves the service layer
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// Account section of the registration wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AccountStep {
    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub confirm_password: String,

    #[validate(length(min = 1, max = 80))]
    pub display_name: String,

    pub role: Role,
}

/// Request DTO for POST /api/auth/register
/// DOCUMENTATION: `profile` is tagged by `kind` and must match `account.role`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub account: AccountStep,
    pub profile: super::ProfileInput,
}

/// Request DTO for POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Response for register and login: the bearer token is only ever shown here
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Session record (token stored as sha256 hex)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Artist".parse::<Role>().unwrap(), Role::Artist);
        assert_eq!(" host ".parse::<Role>().unwrap(), Role::Host);
        assert_eq!(Role::Fan.to_string(), "fan");
        assert!("promoter".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        let role: Role = serde_json::from_str("\"artist\"").unwrap();
        assert_eq!(role, Role::Artist);
    }

    #[test]
    fn test_admin_not_self_registrable() {
        assert!(Role::Artist.is_self_registrable());
        assert!(Role::Host.is_self_registrable());
        assert!(Role::Fan.is_self_registrable());
        assert!(!Role::Admin.is_self_registrable());
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            token_hash: "abc".to_string(),
            user_id: Uuid::new_v4(),
            created_at: now - Duration::hours(2),
            expires_at: now - Duration::seconds(1),
        };
        assert!(session.is_expired(now));
        assert!(!session.is_expired(now - Duration::hours(1)));
    }
}
