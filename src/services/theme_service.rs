// src/services/theme_service.rs
// DOCUMENTATION: Business logic for themes
// PURPOSE: Theme creation, listing, and the read-only detail view

use crate::db::JournalStore;
use crate::errors::JournalError;
use crate::models::{LocationWithPhotos, Theme, ThemeDetail, User};
use crate::services::authz;

pub struct ThemeService;

impl ThemeService {
    /// Create a theme owned by `owner` from an already cleaned name
    pub async fn create_theme(
        store: &dyn JournalStore,
        owner: &User,
        name: &str,
    ) -> Result<Theme, JournalError> {
        let theme = store.create_theme(owner.id, name).await?;
        log::info!("User {} created theme {} ({})", owner.id, theme.name, theme.id);
        Ok(theme)
    }

    /// Themes of `owner`, newest first
    pub async fn list_themes(
        store: &dyn JournalStore,
        owner: &User,
    ) -> Result<Vec<Theme>, JournalError> {
        store.list_themes_by_user(owner.id).await
    }

    /// Theme `id` if `actor` owns it; other users' themes are NotFound
    pub async fn get_owned_theme(
        store: &dyn JournalStore,
        actor: &User,
        id: i64,
    ) -> Result<Theme, JournalError> {
        let theme = store.get_theme(id).await?;
        authz::owned_or_not_found(actor, theme)
    }

    /// Photos of the theme and each location with its own photos
    pub async fn get_detail(
        store: &dyn JournalStore,
        theme: Theme,
    ) -> Result<ThemeDetail, JournalError> {
        let photos = store.list_photos_by_theme(theme.id).await?;
        let locations = store.list_locations_by_theme(theme.id).await?;

        // `photos` is already newest first, so filtering keeps that order
        let locations = locations
            .into_iter()
            .map(|location| LocationWithPhotos {
                photos: photos
                    .iter()
                    .filter(|p| p.location_id == location.id)
                    .cloned()
                    .collect(),
                location,
            })
            .collect();

        Ok(ThemeDetail {
            theme,
            photos,
            locations,
        })
    }
}
