// src/models/theme.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::forms::FormErrors;

use super::{Location, Photo};

/// Named collection of locations and photos owned by one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Theme {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// POST /theme/create/ body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ThemeForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl ThemeForm {
    /// Trimmed name, or the field errors to re-render with
    pub fn clean(&self) -> Result<String, FormErrors> {
        let cleaned = ThemeForm {
            name: self.name.trim().to_string(),
        };
        cleaned.validate().map_err(FormErrors::from)?;
        Ok(cleaned.name)
    }
}

/// Everything the theme detail page shows
#[derive(Debug, Clone)]
pub struct ThemeDetail {
    pub theme: Theme,
    /// All photos of the theme, newest taken_at first
    pub photos: Vec<Photo>,
    pub locations: Vec<LocationWithPhotos>,
}

/// A location and its photos, newest taken_at first
#[derive(Debug, Clone)]
pub struct LocationWithPhotos {
    pub location: Location,
    pub photos: Vec<Photo>,
}
