// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod authz;
pub mod location_service;
pub mod map_service;
pub mod photo_service;
pub mod storage;
pub mod theme_service;
pub mod upload_service;

pub use auth_service::AuthService;
pub use location_service::LocationService;
pub use map_service::MapService;
pub use photo_service::PhotoService;
pub use storage::{LocalStorage, MediaStorage, StorageBackend};
pub use theme_service::ThemeService;
pub use upload_service::{PhotoUploadService, UploadOutcome};
