// src/services/location_service.rs
// DOCUMENTATION: Business logic for locations
// PURPOSE: Guarded edit and delete of a theme's locations

use crate::db::JournalStore;
use crate::errors::JournalError;
use crate::models::{Location, LocationInput, Theme, User};
use crate::services::authz;
use crate::services::storage::{self, StorageBackend};

pub const EDIT_ACTION: &str = "edit this location";
pub const DELETE_ACTION: &str = "delete this location";

/// A location whose theme the acting user owns; only `get_guarded` builds one
#[derive(Debug, Clone)]
pub struct OwnedLocation {
    location: Location,
    theme: Theme,
}

impl OwnedLocation {
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

pub struct LocationService;

impl LocationService {
    /// Location `id` and its theme, if `actor` owns the theme
    pub async fn get_guarded(
        store: &dyn JournalStore,
        actor: &User,
        id: i64,
        action: &str,
    ) -> Result<OwnedLocation, JournalError> {
        let location = store.get_location(id).await?;
        let theme = store.get_theme(location.theme_id).await?;
        authz::ensure_owner(actor, &theme, action)?;
        Ok(OwnedLocation { location, theme })
    }

    /// Number of photos a delete of `location` would remove
    pub async fn photo_count(
        store: &dyn JournalStore,
        location: &Location,
    ) -> Result<usize, JournalError> {
        store.count_photos_by_location(location.id).await
    }

    /// Apply validated fields to an owned location
    /// DOCUMENTATION: A (name, theme) collision comes back as UniquenessConflict
    pub async fn update_location(
        store: &dyn JournalStore,
        actor: &User,
        owned: &OwnedLocation,
        input: &LocationInput,
    ) -> Result<Location, JournalError> {
        let location = store.update_location(owned.location.id, input).await?;
        log::info!("User {} updated location {}", actor.id, location.id);
        Ok(location)
    }

    /// Delete location `id` with all of its photos, then their image files
    /// DOCUMENTATION: Returns the theme id to redirect to
    pub async fn delete_location(
        store: &dyn JournalStore,
        media: &dyn StorageBackend,
        actor: &User,
        id: i64,
    ) -> Result<i64, JournalError> {
        let OwnedLocation { location, theme } =
            Self::get_guarded(store, actor, id, DELETE_ACTION).await?;
        let removed = store.delete_location(location.id).await?;
        log::info!(
            "User {} deleted location {} and {} photos",
            actor.id,
            location.id,
            removed.len()
        );

        let keys: Vec<String> = removed.into_iter().map(|p| p.image).collect();
        storage::remove_quietly(media, &keys).await;
        Ok(theme.id)
    }
}
