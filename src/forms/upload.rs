// src/forms/upload.rs
// DOCUMENTATION: Photo upload form
// PURPOSE: Read the multipart body and validate its photo and location parts

use actix_multipart::Multipart;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use futures_util::TryStreamExt;
use image::ImageFormat;

use crate::errors::JournalError;
use crate::forms::{self, FormErrors, REQUIRED};
use crate::models::{default_location_name, Location, LocationInput, NewLocation};
use validator::Validate;

pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const INVALID_DATETIME: &str = "Enter a valid date/time.";

/// Accepted `taken_at` layouts; datetime-local inputs send the first one
const TAKEN_AT_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Text fields larger than this are rejected outright
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// File part of the upload as received
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
    /// Set when the file exceeded the size limit; `data` is then empty
    pub too_large: bool,
}

/// Text fields of the upload form, kept verbatim for re-rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadFormValues {
    pub caption: String,
    pub taken_at: String,
    /// Selected existing location id, empty for "create new location"
    pub location: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

/// Raw POST /theme/{id}/upload/ body
#[derive(Debug, Clone, Default)]
pub struct UploadSubmission {
    pub image: Option<ImageUpload>,
    pub values: UploadFormValues,
}

/// An image whose bytes were recognised as a supported format
#[derive(Debug, Clone, PartialEq)]
pub struct ValidImage {
    pub data: Vec<u8>,
    pub extension: &'static str,
}

/// Validated photo part of the upload form
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFields {
    pub image: ValidImage,
    pub caption: String,
    pub taken_at: DateTime<Utc>,
}

impl UploadSubmission {
    /// Read every part of a multipart body
    /// DOCUMENTATION: Unknown parts are drained and ignored; the image is
    /// capped at `max_image_bytes`
    pub async fn from_multipart(
        mut payload: Multipart,
        max_image_bytes: usize,
    ) -> Result<Self, JournalError> {
        let mut submission = UploadSubmission::default();

        while let Some(mut field) = payload
            .try_next()
            .await
            .map_err(|e| JournalError::InvalidInput(e.to_string()))?
        {
            let name = field
                .content_disposition()
                .get_name()
                .unwrap_or("")
                .to_string();

            if name == "image" {
                let mut upload = ImageUpload {
                    filename: field
                        .content_disposition()
                        .get_filename()
                        .map(str::to_string),
                    content_type: field.content_type().map(|m| m.to_string()),
                    ..ImageUpload::default()
                };
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| JournalError::InvalidInput(e.to_string()))?
                {
                    if upload.too_large || upload.data.len() + chunk.len() > max_image_bytes {
                        upload.too_large = true;
                        continue;
                    }
                    upload.data.extend_from_slice(&chunk);
                }
                if upload.too_large {
                    upload.data.clear();
                }
                submission.image = Some(upload);
                continue;
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .try_next()
                .await
                .map_err(|e| JournalError::InvalidInput(e.to_string()))?
            {
                if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                    return Err(JournalError::InvalidInput(format!(
                        "Field '{}' is too large",
                        name
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
            let text = String::from_utf8(bytes).map_err(|_| {
                JournalError::InvalidInput(format!("Field '{}' is not valid UTF-8", name))
            })?;

            let values = &mut submission.values;
            match name.as_str() {
                "caption" => values.caption = text,
                "taken_at" => values.taken_at = text,
                "location" => values.location = text,
                "name" => values.name = text,
                "latitude" => values.latitude = text,
                "longitude" => values.longitude = text,
                _ => {}
            }
        }

        Ok(submission)
    }

    /// Validate image, caption and taken_at
    pub fn clean_photo(&self, max_image_bytes: usize) -> Result<PhotoFields, FormErrors> {
        let mut errors = FormErrors::new();

        let image = match &self.image {
            Some(upload) if upload.too_large => {
                errors.add(
                    "image",
                    format!(
                        "The uploaded file is too large (limit is {} bytes).",
                        max_image_bytes
                    ),
                );
                None
            }
            Some(upload) if !upload.data.is_empty() => {
                let image = sniff_image(&upload.data);
                if image.is_none() {
                    errors.add("image", INVALID_IMAGE);
                }
                image
            }
            _ => {
                errors.add("image", REQUIRED);
                None
            }
        };

        let caption = self.values.caption.trim().to_string();
        if caption.chars().count() > 200 {
            errors.add("caption", "Ensure this value has at most 200 characters.");
        }

        let taken_at = if self.values.taken_at.trim().is_empty() {
            errors.add("taken_at", REQUIRED);
            None
        } else {
            let parsed = parse_taken_at(&self.values.taken_at);
            if parsed.is_none() {
                errors.add("taken_at", INVALID_DATETIME);
            }
            parsed
        };

        match (image, taken_at) {
            (Some(image), Some(taken_at)) if errors.is_empty() => Ok(PhotoFields {
                image,
                caption,
                taken_at,
            }),
            _ => Err(errors),
        }
    }

    /// Resolve the `location` select against the theme's locations
    /// DOCUMENTATION: Empty means "create new location" and yields None
    pub fn clean_selection(&self, locations: &[Location]) -> Result<Option<Location>, FormErrors> {
        let raw = self.values.location.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        raw.parse::<i64>()
            .ok()
            .and_then(|id| locations.iter().find(|l| l.id == id))
            .cloned()
            .map(Some)
            .ok_or_else(|| {
                let mut errors = FormErrors::new();
                errors.add("location", INVALID_CHOICE);
                errors
            })
    }

    /// Validate the inline new-location fields for `theme_id`
    /// DOCUMENTATION: A blank name becomes "Location at {lat}, {lng}"
    pub fn clean_new_location(&self, theme_id: i64) -> Result<NewLocation, FormErrors> {
        let mut errors = FormErrors::new();
        let latitude = forms::parse_float("latitude", &self.values.latitude, &mut errors);
        let longitude = forms::parse_float("longitude", &self.values.longitude, &mut errors);
        let (latitude, longitude) = match (latitude, longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(errors),
        };

        let name = forms::optional_text(&self.values.name)
            .unwrap_or_else(|| default_location_name(latitude, longitude));
        let input = LocationInput {
            name,
            latitude,
            longitude,
        };
        input.validate().map_err(FormErrors::from)?;

        Ok(NewLocation {
            theme_id,
            name: input.name,
            latitude: input.latitude,
            longitude: input.longitude,
        })
    }
}

/// Parse a datetime-local value as UTC
pub fn parse_taken_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    TAKEN_AT_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Recognise JPEG, PNG, GIF and WebP by their magic bytes
pub fn sniff_image(data: &[u8]) -> Option<ValidImage> {
    let format = image::guess_format(data).ok()?;
    match format {
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP => {
            let extension = format.extensions_str().first().copied()?;
            Some(ValidImage {
                data: data.to_vec(),
                extension,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01\x00\x00\x00\x01";
