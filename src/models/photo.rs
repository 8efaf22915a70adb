// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Format of the `date` field in the map payload
pub const TAKEN_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Uploaded image tied to a location, a theme, and an uploader
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Photo {
    pub id: i64,
    /// Storage key under the photos/ namespace
    pub image: String,
    /// Empty when the uploader gave none
    pub caption: String,
    pub taken_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
    pub location_id: i64,
    /// Always the theme of `location_id`; set by the store from the location
    pub theme_id: i64,
    /// Uploader
    pub user_id: i64,
}

/// Insert payload for a photo; theme and location come from the LocationChoice
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub image: String,
    pub caption: String,
    pub taken_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Photo entry of the full map payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapPhoto {
    pub id: i64,
    pub url: String,
    pub caption: String,
    pub date: String,
}

impl Photo {
    pub fn to_map_photo(&self, url: String) -> MapPhoto {
        MapPhoto {
            id: self.id,
            url,
            caption: self.caption.clone(),
            date: format_taken_at(self.taken_at),
        }
    }
}

/// "YYYY-MM-DD HH:MM", or "N/A" when the timestamp is unknown
pub fn format_taken_at(taken_at: Option<DateTime<Utc>>) -> String {
    match taken_at {
        Some(ts) => ts.format(TAKEN_AT_FORMAT).to_string(),
        None => "N/A".to_string(),
    }
}

/// Newest taken_at first; photos without a timestamp go last
pub fn sort_by_taken_at_desc(photos: &mut [Photo]) {
    photos.sort_by(|a, b| match (a.taken_at, b.taken_at) {
        (Some(x), Some(y)) => y.cmp(&x).then(b.id.cmp(&a.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    });
}
