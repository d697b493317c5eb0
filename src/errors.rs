// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Internal server error")]
    InternalError,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service temporarily unavailable")]
    #[allow(dead_code)]
    ServiceUnavailable,
}

impl MarketplaceError {
    /// Stable machine-readable code used in the JSON error body
    pub fn error_code(&self) -> &'static str {
        match self {
            MarketplaceError::NotFound(_) => "NOT_FOUND",
            MarketplaceError::AlreadyExists(_) => "ALREADY_EXISTS",
            MarketplaceError::Conflict(_) => "CONFLICT",
            MarketplaceError::InvalidTransition(_) => "INVALID_TRANSITION",
            MarketplaceError::DatabaseError(_) => "DATABASE_ERROR",
            MarketplaceError::InvalidInput(_) => "INVALID_INPUT",
            MarketplaceError::ValidationError(_) => "VALIDATION_ERROR",
            MarketplaceError::Unauthorized => "UNAUTHORIZED",
            MarketplaceError::Forbidden => "FORBIDDEN",
            MarketplaceError::InternalError => "INTERNAL_ERROR",
            MarketplaceError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            MarketplaceError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Map a sqlx error, turning unique violations into AlreadyExists
    /// DOCUMENTATION: Used by repositories in their map_err closures
    pub fn from_db(context: &str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // 23505 = unique_violation
            if db_err.code().as_deref() == Some("23505") {
                return MarketplaceError::AlreadyExists(context.to_string());
            }
        }
        log::error!("{} failed: {}", context, err);
        MarketplaceError::DatabaseError(format!("{} failed: {}", context, err))
    }
}

impl From<validator::ValidationErrors> for MarketplaceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MarketplaceError::ValidationError(errors.to_string())
    }
}

/// Convert MarketplaceError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for MarketplaceError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketplaceError::AlreadyExists(_) => StatusCode::CONFLICT,
            MarketplaceError::Conflict(_) => StatusCode::CONFLICT,
            MarketplaceError::InvalidTransition(_) => StatusCode::CONFLICT,
            MarketplaceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MarketplaceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MarketplaceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            MarketplaceError::Unauthorized => StatusCode::UNAUTHORIZED,
            MarketplaceError::Forbidden => StatusCode::FORBIDDEN,
            MarketplaceError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            MarketplaceError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            MarketplaceError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            MarketplaceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MarketplaceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            MarketplaceError::InvalidTransition("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            MarketplaceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(MarketplaceError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(MarketplaceError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            MarketplaceError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_rt::test]
    async fn test_error_body_shape() {
        let err = MarketplaceError::NotFound("booking 42".into());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Not found: booking 42");
        assert!(body["error"]["timestamp"].is_string());
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err = MarketplaceError::from_db("Fetch user", sqlx::Error::RowNotFound);
        assert!(matches!(err, MarketplaceError::DatabaseError(_)));
    }
}
