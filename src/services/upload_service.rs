// src/services/upload_service.rs
// DOCUMENTATION: Photo upload flow
// PURPOSE: Validate the upload form, pick or create the location, store the photo

use crate::db::JournalStore;
use crate::errors::JournalError;
use crate::forms::{FormErrors, UploadSubmission};
use crate::models::{Location, LocationChoice, NewPhoto, Photo, Theme, User};
use crate::services::storage::{self, StorageBackend};

pub const SUBMISSION_ERROR: &str =
    "There was an error with your submission. Please check the form.";
pub const NO_LOCATION_ERROR: &str = "Please select a location or create a valid new one.";
pub const DUPLICATE_LOCATION_ERROR: &str =
    "A location with the same name and theme already exists.";

/// Result of one upload attempt
#[derive(Debug)]
pub enum UploadOutcome {
    Uploaded(Photo),
    /// Nothing was committed; the form is shown again
    Rejected(UploadRejection),
}

#[derive(Debug)]
pub struct UploadRejection {
    pub errors: FormErrors,
    /// Page-level message, if any
    pub message: Option<&'static str>,
    /// Valid existing-location selection to keep pre-selected
    pub selected: Option<Location>,
}

pub struct PhotoUploadService;

impl PhotoUploadService {
    /// Locations offered in the upload form
    pub async fn theme_locations(
        store: &dyn JournalStore,
        theme: &Theme,
    ) -> Result<Vec<Location>, JournalError> {
        store.list_locations_by_theme(theme.id).await
    }

    /// Run the upload policy for `submission` against `theme`
    /// DOCUMENTATION:
    /// 1. photo fields and the location select must be valid
    /// 2. a selected existing location is used as is
    /// 3. otherwise a new location is created with the photo; a (name, theme)
    ///    collision rejects the whole upload
    /// 4. with neither, the upload is rejected with a generic message
    pub async fn upload(
        store: &dyn JournalStore,
        media: &dyn StorageBackend,
        uploader: &User,
        theme: &Theme,
        submission: &UploadSubmission,
        max_image_bytes: usize,
    ) -> Result<UploadOutcome, JournalError> {
        let locations = Self::theme_locations(store, theme).await?;

        let (fields, selected) = match (
            submission.clean_photo(max_image_bytes),
            submission.clean_selection(&locations),
        ) {
            (Ok(fields), Ok(selected)) => (fields, selected),
            (photo, selection) => {
                let mut errors = FormErrors::new();
                if let Err(e) = photo {
                    errors.merge(e);
                }
                let selected = match selection {
                    Ok(selected) => selected,
                    Err(e) => {
                        errors.merge(e);
                        None
                    }
                };
                return Ok(UploadOutcome::Rejected(UploadRejection {
                    errors,
                    message: Some(SUBMISSION_ERROR),
                    selected,
                }));
            }
        };

        let choice = match selected {
            Some(location) => LocationChoice::Existing(location),
            None => match submission.clean_new_location(theme.id) {
                Ok(new_location) => LocationChoice::New(new_location),
                Err(errors) => {
                    return Ok(UploadOutcome::Rejected(UploadRejection {
                        errors,
                        message: Some(NO_LOCATION_ERROR),
                        selected: None,
                    }))
                }
            },
        };

        let key = storage::new_photo_key(fields.image.extension);
        media.save(&key, &fields.image.data).await?;

        let new_photo = NewPhoto {
            image: key.clone(),
            caption: fields.caption,
            taken_at: fields.taken_at,
            user_id: uploader.id,
        };

        match store.create_photo(&new_photo, &choice).await {
            Ok(photo) => {
                log::info!(
                    "User {} uploaded photo {} to location {} in theme {}",
                    uploader.id,
                    photo.id,
                    photo.location_id,
                    photo.theme_id
                );
                Ok(UploadOutcome::Uploaded(photo))
            }
            Err(e) => {
                storage::remove_quietly(media, &[key]).await;
                match e {
                    JournalError::UniquenessConflict(_) => {
                        let mut errors = FormErrors::new();
                        errors.add("name", DUPLICATE_LOCATION_ERROR);
                        Ok(UploadOutcome::Rejected(UploadRejection {
                            errors,
                            message: None,
                            selected: None,
                        }))
                    }
                    other => Err(other),
                }
            }
        }
    }
}
