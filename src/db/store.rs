// src/db/store.rs
// DOCUMENTATION: Persistence contract for the journal
// PURPOSE: One trait for every read and write the services need

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::errors::JournalError;
use crate::models::*;

pub const LOCATION_CONFLICT: &str = "Location with this Name and Theme already exists.";
pub const USERNAME_CONFLICT: &str = "A user with that username already exists.";

/// Storage for users, sessions, themes, locations and photos
/// DOCUMENTATION: Implemented by PgStore (production) and MemoryStore
/// (tests and DATABASE_URL=memory://). Every mutation is atomic; the
/// (name, theme) uniqueness of locations surfaces as UniquenessConflict.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Insert an account; duplicate usernames are a UniquenessConflict
    async fn create_user(&self, user: &NewUser) -> Result<User, JournalError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, JournalError>;

    /// Store a new session and drop every session already expired
    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), JournalError>;

    /// User behind a session token that has not expired at `now`
    async fn get_session_user(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, JournalError>;

    async fn delete_session(&self, token: &str) -> Result<(), JournalError>;

    async fn create_theme(&self, user_id: i64, name: &str) -> Result<Theme, JournalError>;

    async fn get_theme(&self, id: i64) -> Result<Theme, JournalError>;

    /// Themes of one user, newest first
    async fn list_themes_by_user(&self, user_id: i64) -> Result<Vec<Theme>, JournalError>;

    async fn create_location(&self, location: &NewLocation) -> Result<Location, JournalError>;

    async fn get_location(&self, id: i64) -> Result<Location, JournalError>;

    /// Locations of one theme in id order
    async fn list_locations_by_theme(&self, theme_id: i64) -> Result<Vec<Location>, JournalError>;

    async fn update_location(
        &self,
        id: i64,
        input: &LocationInput,
    ) -> Result<Location, JournalError>;

    /// Delete a location and every photo referencing it in one transaction
    /// DOCUMENTATION: Returns the removed photos so their files can be cleaned up
    async fn delete_location(&self, id: i64) -> Result<Vec<Photo>, JournalError>;

    /// Insert a photo, creating its location first when asked to
    /// DOCUMENTATION: The photo's theme is copied from the location inside the
    /// same write, so the two can never disagree
    async fn create_photo(
        &self,
        photo: &NewPhoto,
        location: &LocationChoice,
    ) -> Result<Photo, JournalError>;

    async fn get_photo(&self, id: i64) -> Result<Photo, JournalError>;

    /// Photos of one theme, newest taken_at first, missing timestamps last
    async fn list_photos_by_theme(&self, theme_id: i64) -> Result<Vec<Photo>, JournalError>;

    async fn count_photos_by_location(&self, location_id: i64) -> Result<usize, JournalError>;

    async fn delete_photo(&self, id: i64) -> Result<(), JournalError>;
}

/// Shared store handle registered as application data
pub type Store = Arc<dyn JournalStore>;
