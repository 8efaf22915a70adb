// src/handlers/maps.rs
// DOCUMENTATION: Map page and the JSON endpoints the map widget reads

use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::db::Store;
use crate::errors::JournalError;
use crate::handlers::extractors::CurrentUser;
use crate::handlers::flash::{self, IncomingFlash};
use crate::services::{MapService, MediaStorage, ThemeService};
use crate::views::{self, PageFrame};

/// GET /theme/{id}/map/
pub async fn view_map(
    store: web::Data<Store>,
    media: web::Data<MediaStorage>,
    config: web::Data<Config>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let theme = ThemeService::get_owned_theme(store, &user.0, path.into_inner()).await?;
    let payload = MapService::map_payload(store, media.get_ref().as_ref(), theme.id).await?;
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(
        &flash,
        views::maps::map_page(&frame, &theme, &payload, &config.google_maps_api_key),
    ))
}

/// GET /theme/{id}/get_locations/
/// [{id, name, lat, lng}]
pub async fn get_locations(
    store: web::Data<Store>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let theme = ThemeService::get_owned_theme(store, &user.0, path.into_inner()).await?;
    let locations = MapService::location_summaries(store, theme.id).await?;
    Ok(HttpResponse::Ok().json(locations))
}

/// GET /theme/{id}/map_data/
/// Locations with their photos, as embedded in the map page
pub async fn map_data(
    store: web::Data<Store>,
    media: web::Data<MediaStorage>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let theme = ThemeService::get_owned_theme(store, &user.0, path.into_inner()).await?;
    let payload = MapService::map_payload(store, media.get_ref().as_ref(), theme.id).await?;
    Ok(HttpResponse::Ok().json(payload))
}

/// Configuration for map routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/theme/{id}/map/", web::get().to(view_map))
        .route("/theme/{id}/get_locations/", web::get().to(get_locations))
        .route("/theme/{id}/map_data/", web::get().to(map_data));
}
