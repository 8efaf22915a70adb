// src/services/map_service.rs
// DOCUMENTATION: JSON payloads behind the map pages

use crate::db::JournalStore;
use crate::errors::JournalError;
use crate::models::{LocationSummary, MapLocation};
use crate::services::storage::StorageBackend;

pub struct MapService;

impl MapService {
    /// Every location of the theme as {id, name, lat, lng}
    pub async fn location_summaries(
        store: &dyn JournalStore,
        theme_id: i64,
    ) -> Result<Vec<LocationSummary>, JournalError> {
        let locations = store.list_locations_by_theme(theme_id).await?;
        Ok(locations.iter().map(|l| l.to_summary()).collect())
    }

    /// Locations with their photos, newest taken_at first within each location
    pub async fn map_payload(
        store: &dyn JournalStore,
        media: &dyn StorageBackend,
        theme_id: i64,
    ) -> Result<Vec<MapLocation>, JournalError> {
        let locations = store.list_locations_by_theme(theme_id).await?;
        let photos = store.list_photos_by_theme(theme_id).await?;

        let payload = locations
            .into_iter()
            .map(|location| MapLocation {
                photos: photos
                    .iter()
                    .filter(|p| p.location_id == location.id)
                    .map(|p| p.to_map_photo(media.url(&p.image)))
                    .collect(),
                id: location.id,
                name: location.name,
                lat: location.latitude,
                lng: location.longitude,
            })
            .collect();

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{LocationChoice, NewLocation, NewPhoto, NewUser, Photo};
    use crate::services::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_empty_theme() {
        let store = MemoryStore::new();
        let media = MemoryStorage::default();
        assert!(MapService::location_summaries(&store, 1).await.unwrap().is_empty());
        assert!(MapService::map_payload(&store, &media, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payload_orders_photos_and_marks_missing_dates() {
        let store = MemoryStore::new();
        let media = MemoryStorage::default();
        let user = store
            .create_user(&NewUser {
                username: "mio".to_string(),
                email: "mio@example.com".to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();
        let theme = store.create_theme(user.id, "Coast").await.unwrap();
        let location = store
            .create_location(&NewLocation {
                theme_id: theme.id,
                name: "Cape".to_string(),
                latitude: 34.5,
                longitude: 135.25,
            })
            .await
            .unwrap();

        let dated = store
            .create_photo(
                &NewPhoto {
                    image: "photos/a.jpg".to_string(),
                    caption: "sunset".to_string(),
                    taken_at: Utc.with_ymd_and_hms(2023, 8, 14, 18, 45, 0).unwrap(),
                    user_id: user.id,
                },
                &LocationChoice::Existing(location.clone()),
            )
            .await
            .unwrap();
        let undated = store
            .insert_photo_row(Photo {
                id: 0,
                image: "photos/b.jpg".to_string(),
                caption: String::new(),
                taken_at: None,
                uploaded_at: Utc::now(),
                location_id: location.id,
                theme_id: theme.id,
                user_id: user.id,
            })
            .await;

        let summaries = MapService::location_summaries(&store, theme.id).await.unwrap();
        assert_eq!(summaries, vec![location.to_summary()]);

        let payload = MapService::map_payload(&store, &media, theme.id).await.unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].name, "Cape");
        assert_eq!(payload[0].lat, 34.5);
        assert_eq!(payload[0].lng, 135.25);

        let photos = &payload[0].photos;
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id, dated.id);
        assert_eq!(photos[0].date, "2023-08-14 18:45");
        assert_eq!(photos[0].url, "/media/photos/a.jpg");
        assert_eq!(photos[0].caption, "sunset");
        assert_eq!(photos[1].id, undated.id);
        assert_eq!(photos[1].date, "N/A");
    }
}
