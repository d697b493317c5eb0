// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod booking;
pub mod dashboard;
pub mod pagination;
pub mod photo;
pub mod profile;
pub mod review;
pub mod tour;
pub mod user;

pub use booking::*;
pub use dashboard::*;
pub use pagination::*;
pub use photo::*;
pub use profile::*;
pub use review::*;
pub use tour::*;
pub use user::*;
