// src/db/memory_store.rs
// DOCUMENTATION: In-memory implementation of JournalStore
// PURPOSE: Backing store for tests and DATABASE_URL=memory:// local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::store::{JournalStore, LOCATION_CONFLICT, USERNAME_CONFLICT};
use crate::errors::JournalError;
use crate::models::*;

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    users: Vec<User>,
    /// token -> (user id, expiry)
    sessions: HashMap<String, (i64, DateTime<Utc>)>,
    themes: Vec<Theme>,
    locations: Vec<Location>,
    photos: Vec<Photo>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn location_name_taken(&self, name: &str, theme_id: i64, except: Option<i64>) -> bool {
        self.locations
            .iter()
            .any(|l| l.name == name && l.theme_id == theme_id && Some(l.id) != except)
    }
}

/// Thread-safe store holding every table in one lock
/// DOCUMENTATION: A single RwLock makes each operation atomic, which mirrors
/// the transactional guarantees of the PostgreSQL store
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, JournalError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(JournalError::UniquenessConflict(USERNAME_CONFLICT.to_string()));
        }
        let created = User {
            id: state.next_id(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            date_joined: Utc::now(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, JournalError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), JournalError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        state.sessions.retain(|_, (_, expires)| *expires > now);
        state
            .sessions
            .insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn get_session_user(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, JournalError> {
        let state = self.state.read().await;
        let user = match state.sessions.get(token) {
            Some((user_id, expires_at)) if *expires_at > now => {
                state.users.iter().find(|u| u.id == *user_id).cloned()
            }
            _ => None,
        };
        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> Result<(), JournalError> {
        self.state.write().await.sessions.remove(token);
        Ok(())
    }

    async fn create_theme(&self, user_id: i64, name: &str) -> Result<Theme, JournalError> {
        let mut state = self.state.write().await;
        let theme = Theme {
            id: state.next_id(),
            name: name.to_string(),
            user_id,
            created_at: Utc::now(),
        };
        state.themes.push(theme.clone());
        Ok(theme)
    }

    async fn get_theme(&self, id: i64) -> Result<Theme, JournalError> {
        let state = self.state.read().await;
        state
            .themes
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| JournalError::not_found("theme", id))
    }

    async fn list_themes_by_user(&self, user_id: i64) -> Result<Vec<Theme>, JournalError> {
        let state = self.state.read().await;
        let mut themes: Vec<Theme> = state
            .themes
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        themes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(themes)
    }

    async fn create_location(&self, location: &NewLocation) -> Result<Location, JournalError> {
        let mut state = self.state.write().await;
        if !state.themes.iter().any(|t| t.id == location.theme_id) {
            return Err(JournalError::not_found("theme", location.theme_id));
        }
        if state.location_name_taken(&location.name, location.theme_id, None) {
            return Err(JournalError::UniquenessConflict(LOCATION_CONFLICT.to_string()));
        }
        let created = Location {
            id: state.next_id(),
            name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            theme_id: location.theme_id,
        };
        state.locations.push(created.clone());
        Ok(created)
    }

    async fn get_location(&self, id: i64) -> Result<Location, JournalError> {
        let state = self.state.read().await;
        state
            .locations
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| JournalError::not_found("location", id))
    }

    async fn list_locations_by_theme(&self, theme_id: i64) -> Result<Vec<Location>, JournalError> {
        let state = self.state.read().await;
        let mut locations: Vec<Location> = state
            .locations
            .iter()
            .filter(|l| l.theme_id == theme_id)
            .cloned()
            .collect();
        locations.sort_by_key(|l| l.id);
        Ok(locations)
    }

    async fn update_location(
        &self,
        id: i64,
        input: &LocationInput,
    ) -> Result<Location, JournalError> {
        let mut state = self.state.write().await;
        let theme_id = state
            .locations
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.theme_id)
            .ok_or_else(|| JournalError::not_found("location", id))?;
        if state.location_name_taken(&input.name, theme_id, Some(id)) {
            return Err(JournalError::UniquenessConflict(LOCATION_CONFLICT.to_string()));
        }
        let location = state
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| JournalError::not_found("location", id))?;
        location.name = input.name.clone();
        location.latitude = input.latitude;
        location.longitude = input.longitude;
        Ok(location.clone())
    }

    async fn delete_location(&self, id: i64) -> Result<Vec<Photo>, JournalError> {
        let mut state = self.state.write().await;
        if !state.locations.iter().any(|l| l.id == id) {
            return Err(JournalError::not_found("location", id));
        }
        let (removed, kept): (Vec<Photo>, Vec<Photo>) = std::mem::take(&mut state.photos)
            .into_iter()
            .partition(|p| p.location_id == id);
        state.photos = kept;
        state.locations.retain(|l| l.id != id);
        Ok(removed)
    }

    async fn create_photo(
        &self,
        photo: &NewPhoto,
        location: &LocationChoice,
    ) -> Result<Photo, JournalError> {
        let mut state = self.state.write().await;

        let (location_id, theme_id) = match location {
            LocationChoice::Existing(existing) => {
                let stored = state
                    .locations
                    .iter()
                    .find(|l| l.id == existing.id)
                    .ok_or_else(|| JournalError::not_found("location", existing.id))?;
                (stored.id, stored.theme_id)
            }
            LocationChoice::New(new_location) => {
                if !state.themes.iter().any(|t| t.id == new_location.theme_id) {
                    return Err(JournalError::not_found("theme", new_location.theme_id));
                }
                if state.location_name_taken(&new_location.name, new_location.theme_id, None) {
                    return Err(JournalError::UniquenessConflict(LOCATION_CONFLICT.to_string()));
                }
                let created = Location {
                    id: state.next_id(),
                    name: new_location.name.clone(),
                    latitude: new_location.latitude,
                    longitude: new_location.longitude,
                    theme_id: new_location.theme_id,
                };
                let ids = (created.id, created.theme_id);
                state.locations.push(created);
                ids
            }
        };

        let created = Photo {
            id: state.next_id(),
            image: photo.image.clone(),
            caption: photo.caption.clone(),
            taken_at: Some(photo.taken_at),
            uploaded_at: Utc::now(),
            location_id,
            theme_id,
            user_id: photo.user_id,
        };
        state.photos.push(created.clone());
        Ok(created)
    }

    async fn get_photo(&self, id: i64) -> Result<Photo, JournalError> {
        let state = self.state.read().await;
        state
            .photos
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| JournalError::not_found("photo", id))
    }

    async fn list_photos_by_theme(&self, theme_id: i64) -> Result<Vec<Photo>, JournalError> {
        let state = self.state.read().await;
        let mut photos: Vec<Photo> = state
            .photos
            .iter()
            .filter(|p| p.theme_id == theme_id)
            .cloned()
            .collect();
        sort_by_taken_at_desc(&mut photos);
        Ok(photos)
    }

    async fn count_photos_by_location(&self, location_id: i64) -> Result<usize, JournalError> {
        let state = self.state.read().await;
        Ok(state
            .photos
            .iter()
            .filter(|p| p.location_id == location_id)
            .count())
    }

    async fn delete_photo(&self, id: i64) -> Result<(), JournalError> {
        let mut state = self.state.write().await;
        let before = state.photos.len();
        state.photos.retain(|p| p.id != id);
        if state.photos.len() == before {
            return Err(JournalError::not_found("photo", id));
        }
        Ok(())
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Insert a photo row as-is, e.g. one without a taken_at
    pub async fn insert_photo_row(&self, mut photo: Photo) -> Photo {
        let mut state = self.state.write().await;
        photo.id = state.next_id();
        state.photos.push(photo.clone());
        photo
    }

    pub async fn location_count(&self) -> usize {
        self.state.read().await.locations.len()
    }

    pub async fn photo_count(&self) -> usize {
        self.state.read().await.photos.len()
    }

    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn store_with_theme() -> (MemoryStore, Theme) {
        let store = MemoryStore::new();
        let theme = store.create_theme(1, "Trip").await.unwrap();
        (store, theme)
    }

    fn new_location(theme_id: i64, name: &str) -> NewLocation {
        NewLocation {
            theme_id,
            name: name.to_string(),
            latitude: 35.0,
            longitude: 139.0,
        }
    }

    fn new_photo(user_id: i64) -> NewPhoto {
        NewPhoto {
            image: "photos/a.png".to_string(),
            caption: String::new(),
            taken_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            user_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_location_in_same_theme_is_rejected() {
        let (store, theme) = store_with_theme().await;
        store.create_location(&new_location(theme.id, "Station")).await.unwrap();

        let err = store
            .create_location(&new_location(theme.id, "Station"))
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::UniquenessConflict(_)));
        assert_eq!(store.list_locations_by_theme(theme.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_location_name_in_other_theme_is_fine() {
        let (store, theme) = store_with_theme().await;
        let other = store.create_theme(1, "Other trip").await.unwrap();
        store.create_location(&new_location(theme.id, "Station")).await.unwrap();
        assert!(store.create_location(&new_location(other.id, "Station")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_location_checks_uniqueness_against_others_only() {
        let (store, theme) = store_with_theme().await;
        let a = store.create_location(&new_location(theme.id, "A")).await.unwrap();
        store.create_location(&new_location(theme.id, "B")).await.unwrap();

        let keep_name = LocationInput {
            name: "A".to_string(),
            latitude: 1.0,
            longitude: 2.0,
        };
        assert_eq!(store.update_location(a.id, &keep_name).await.unwrap().latitude, 1.0);

        let clash = LocationInput {
            name: "B".to_string(),
            ..keep_name
        };
        assert!(matches!(
            store.update_location(a.id, &clash).await,
            Err(JournalError::UniquenessConflict(_))
        ));
    }

    #[tokio::test]
    async fn test_new_location_photo_takes_theme_from_location() {
        let (store, theme) = store_with_theme().await;
        let photo = store
            .create_photo(&new_photo(1), &LocationChoice::New(new_location(theme.id, "Gate")))
            .await
            .unwrap();
        let location = store.get_location(photo.location_id).await.unwrap();
        assert_eq!(location.theme_id, theme.id);
        assert_eq!(photo.theme_id, theme.id);
    }

    #[tokio::test]
    async fn test_conflicting_new_location_stores_nothing() {
        let (store, theme) = store_with_theme().await;
        store.create_location(&new_location(theme.id, "Gate")).await.unwrap();

        let err = store
            .create_photo(&new_photo(1), &LocationChoice::New(new_location(theme.id, "Gate")))
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::UniquenessConflict(_)));
        assert_eq!(store.photo_count().await, 0);
        assert_eq!(store.location_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_location_cascades_to_photos() {
        let (store, theme) = store_with_theme().await;
        let location = store.create_location(&new_location(theme.id, "Gate")).await.unwrap();
        let keep = store.create_location(&new_location(theme.id, "Park")).await.unwrap();
        let p1 = store
            .create_photo(&new_photo(1), &LocationChoice::Existing(location.clone()))
            .await
            .unwrap();
        let p2 = store
            .create_photo(&new_photo(1), &LocationChoice::Existing(location.clone()))
            .await
            .unwrap();
        let other = store
            .create_photo(&new_photo(1), &LocationChoice::Existing(keep))
            .await
            .unwrap();

        let removed = store.delete_location(location.id).await.unwrap();
        assert_eq!(removed.len(), 2);
        assert!(matches!(store.get_photo(p1.id).await, Err(JournalError::NotFound(_))));
        assert!(matches!(store.get_photo(p2.id).await, Err(JournalError::NotFound(_))));
        assert!(store.get_photo(other.id).await.is_ok());
        assert!(matches!(
            store.get_location(location.id).await,
            Err(JournalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored() {
        let store = MemoryStore::new();
        let user = store
            .create_user(&NewUser {
                username: "hana".to_string(),
                email: "hana@example.com".to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();
        let now = Utc::now();
        store
            .create_session("live", user.id, now + chrono::Duration::hours(1))
            .await
            .unwrap();
        store
            .create_session("stale", user.id, now - chrono::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.get_session_user("live", now).await.unwrap(), Some(user));
        assert_eq!(store.get_session_user("stale", now).await.unwrap(), None);
        store.delete_session("live").await.unwrap();
        assert_eq!(store.get_session_user("live", now).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_new_session_purges_expired_ones() {
        let store = MemoryStore::new();
        let user = store
            .create_user(&NewUser {
                username: "hana".to_string(),
                email: "hana@example.com".to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();
        let now = Utc::now();
        store
            .create_session("old", user.id, now - chrono::Duration::hours(1))
            .await
            .unwrap();
        store
            .create_session("open", user.id, now + chrono::Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(store.session_count().await, 1);

        store
            .create_session("next", user.id, now + chrono::Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(store.session_count().await, 2);
    }
}
