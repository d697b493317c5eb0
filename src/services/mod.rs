// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod admin_service;
pub mod auth_service;
pub mod booking_service;
pub mod cache;
pub mod dashboard_service;
pub mod photo_service;
pub mod profile_service;
pub mod rate_limit;
pub mod registration;
pub mod review_service;
pub mod tour_planner;
pub mod tour_service;
pub mod us_states;

pub use admin_service::*;
pub use auth_service::*;
pub use booking_service::*;
pub use cache::*;
pub use dashboard_service::*;
pub use photo_service::*;
pub use profile_service::*;
pub use rate_limit::*;
pub use review_service::*;
pub use tour_service::*;
