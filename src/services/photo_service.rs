// src/services/photo_service.rs
// DOCUMENTATION: Business logic for existing photos
// PURPOSE: Guarded photo deletion; only the uploader may delete

use crate::db::JournalStore;
use crate::errors::JournalError;
use crate::models::{Photo, User};
use crate::services::authz;
use crate::services::storage::{self, StorageBackend};

pub const DELETE_ACTION: &str = "delete this photo";

pub struct PhotoService;

impl PhotoService {
    /// Photo `id` if `actor` uploaded it
    pub async fn get_guarded(
        store: &dyn JournalStore,
        actor: &User,
        id: i64,
    ) -> Result<Photo, JournalError> {
        let photo = store.get_photo(id).await?;
        authz::ensure_owner(actor, &photo, DELETE_ACTION)?;
        Ok(photo)
    }

    /// Delete photo `id` and its image file
    /// DOCUMENTATION: Returns the theme id to redirect to
    pub async fn delete_photo(
        store: &dyn JournalStore,
        media: &dyn StorageBackend,
        actor: &User,
        id: i64,
    ) -> Result<i64, JournalError> {
        let photo = Self::get_guarded(store, actor, id).await?;
        store.delete_photo(photo.id).await?;
        log::info!("User {} deleted photo {}", actor.id, photo.id);
        storage::remove_quietly(media, &[photo.image]).await;
        Ok(photo.theme_id)
    }
}
