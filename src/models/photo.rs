// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Maximum photos a single user may register
pub const MAX_PHOTOS_PER_USER: i64 = 20;

/// Profile photo registered through /api/upload
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub photo_url: String,
    pub thumbnail_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register an uploaded photo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePhotoRequest {
    #[validate(url, length(max = 2048))]
    pub photo_url: String,
    #[validate(url, length(max = 2048))]
    pub thumbnail_url: Option<String>,
    #[validate(range(min = 1, max = 20000))]
    pub width: Option<i32>,
    #[validate(range(min = 1, max = 20000))]
    pub height: Option<i32>,
    #[validate(length(max = 200))]
    pub caption: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    pub display_order: Option<i32>,
}

/// Photo DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub photo_url: String,
    pub thumbnail_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub display_order: i32,
}

impl Photo {
    /// Convert database photo into API response DTO
    pub fn to_response(&self) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            photo_url: self.photo_url.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            width: self.width,
            height: self.height,
            caption: self.caption.clone(),
            is_primary: self.is_primary,
            display_order: self.display_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreatePhotoRequest {
        CreatePhotoRequest {
            photo_url: "https://cdn.example.com/u/1/stage.jpg".to_string(),
            thumbnail_url: None,
            width: Some(1200),
            height: Some(800),
            caption: Some("Live at the barn".to_string()),
            is_primary: true,
            display_order: None,
        }
    }

    #[test]
    fn test_valid_photo() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut req = request();
        req.photo_url = "not a url".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut req = request();
        req.width = Some(0);
        assert!(req.validate().is_err());
    }
}
