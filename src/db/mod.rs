// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod booking_repository;
pub mod photo_repository;
pub mod profile_repository;
pub mod review_repository;
pub mod session_repository;
pub mod tour_repository;
pub mod user_repository;

pub use booking_repository::*;
pub use photo_repository::*;
pub use profile_repository::*;
pub use review_repository::*;
pub use session_repository::*;
pub use tour_repository::*;
pub use user_repository::*;

use crate::errors::MarketplaceError;
use std::str::FromStr;

/// Parse a TEXT column holding an enum value
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, MarketplaceError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|e: String| {
        log::error!("Corrupt {} column: {}", column, e);
        MarketplaceError::DatabaseError(format!("Invalid {} value: {}", column, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, Role};

    #[test]
    fn test_parse_column() {
        let role: Role = parse_column("role", "host").unwrap();
        assert_eq!(role, Role::Host);

        let status: Result<BookingStatus, _> = parse_column("status", "archived");
        assert!(matches!(status, Err(MarketplaceError::DatabaseError(_))));
    }
}
