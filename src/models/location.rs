// src/models/location.rs
// DOCUMENTATION: Named geographic points scoped to a theme
// PURPOSE: Database model, edit form, and the JSON shapes fed to the map widget

use geo_types::Point;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::forms::{self, FormErrors};

use super::MapPhoto;

/// Location record; (name, theme_id) is unique
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub theme_id: i64,
}

impl Location {
    /// Coordinates as a geo point (x = longitude, y = latitude)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Entry of GET /theme/{id}/get_locations/
    pub fn to_summary(&self) -> LocationSummary {
        let point = self.point();
        LocationSummary {
            id: self.id,
            name: self.name.clone(),
            lat: point.y(),
            lng: point.x(),
        }
    }

    /// Entry of the upload page prefill list
    pub fn to_option(&self) -> LocationOption {
        LocationOption {
            id: self.id,
            name: self.name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Validated coordinates and name, ready to persist
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct LocationInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// A location about to be created inside a theme
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub theme_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Where an uploaded photo goes
#[derive(Debug, Clone, PartialEq)]
pub enum LocationChoice {
    /// An existing location of the theme
    Existing(Location),
    /// A location created in the same write as the photo
    New(NewLocation),
}

/// Name used when an inline location is created without one
pub fn default_location_name(latitude: f64, longitude: f64) -> String {
    format!("Location at {:.4}, {:.4}", latitude, longitude)
}

/// Raw POST /location/{id}/edit/ body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

impl LocationForm {
    pub fn from_location(location: &Location) -> Self {
        LocationForm {
            name: location.name.clone(),
            latitude: location.latitude.to_string(),
            longitude: location.longitude.to_string(),
        }
    }

    pub fn clean(&self) -> Result<LocationInput, FormErrors> {
        let mut errors = FormErrors::new();
        let latitude = forms::parse_float("latitude", &self.latitude, &mut errors);
        let longitude = forms::parse_float("longitude", &self.longitude, &mut errors);

        let input = LocationInput {
            name: self.name.trim().to_string(),
            latitude: latitude.unwrap_or_default(),
            longitude: longitude.unwrap_or_default(),
        };
        if let Err(e) = input.validate() {
            errors.merge(e.into());
        }

        errors.into_result().map(|()| input)
    }
}

/// {id, name, lat, lng} for the location list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSummary {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// {id, name, latitude, longitude} embedded in the upload page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocationOption {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One marker of the full map payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapLocation {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub photos: Vec<MapPhoto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, latitude: &str, longitude: &str) -> LocationForm {
        LocationForm {
            name: name.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }
    }

    #[test]
    fn test_default_name_uses_four_decimals() {
        assert_eq!(
            default_location_name(35.676191, 139.650311),
            "Location at 35.6762, 139.6503"
        );
        assert_eq!(default_location_name(-1.0, 2.5), "Location at -1.0000, 2.5000");
    }

    #[test]
    fn test_clean_valid_form() {
        let input = form(" Fushimi Inari ", "34.9671", "135.7727").clean().unwrap();
        assert_eq!(input.name, "Fushimi Inari");
        assert_eq!(input.latitude, 34.9671);
        assert_eq!(input.longitude, 135.7727);
    }

    #[test]
    fn test_clean_reports_each_field_once() {
        let errors = form("", "north", "200").clean().unwrap_err();
        assert_eq!(errors.field("name"), &[forms::REQUIRED.to_string()]);
        assert_eq!(errors.field("latitude"), &[forms::ENTER_A_NUMBER.to_string()]);
        assert_eq!(errors.field("longitude").len(), 1);
        assert!(errors.field("longitude")[0].starts_with("Ensure this value is between"));
    }

    #[test]
    fn test_summary_keeps_coordinates() {
        let location = Location {
            id: 7,
            name: "Pier".to_string(),
            latitude: 1.5,
            longitude: -2.5,
            theme_id: 1,
        };
        let summary = location.to_summary();
        assert_eq!(summary.lat, 1.5);
        assert_eq!(summary.lng, -2.5);
        let option = location.to_option();
        assert_eq!(option.latitude, 1.5);
        assert_eq!(option.longitude, -2.5);
    }
}
