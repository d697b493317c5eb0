// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod profiles;
pub mod reviews;
pub mod tours;

pub use admin::config as admin_config;
pub use auth::config as auth_config;
pub use bookings::config as bookings_config;
pub use dashboard::config as dashboard_config;
pub use health::config as health_config;
pub use profiles::config as profiles_config;
pub use reviews::config as reviews_config;
pub use tours::config as tours_config;
