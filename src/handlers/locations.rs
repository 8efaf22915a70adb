// src/handlers/locations.rs
// DOCUMENTATION: HTTP handlers for location edit and delete
// PURPOSE: Both require owning the location's theme

use actix_web::{web, HttpResponse};

use crate::db::{Store, LOCATION_CONFLICT};
use crate::errors::JournalError;
use crate::forms::FormErrors;
use crate::handlers::extractors::CurrentUser;
use crate::handlers::flash::{self, IncomingFlash};
use crate::handlers::themes::theme_url;
use crate::models::LocationForm;
use crate::services::location_service::{DELETE_ACTION, EDIT_ACTION};
use crate::services::{LocationService, MediaStorage};
use crate::views::{self, FlashMessage, PageFrame};

pub const LOCATION_UPDATED: &str = "Location updated successfully.";
pub const LOCATION_DELETED: &str = "Location and associated photos deleted successfully.";

/// GET /location/{id}/edit/
pub async fn edit_form(
    store: web::Data<Store>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let owned =
        LocationService::get_guarded(store.get_ref().as_ref(), &user.0, path.into_inner(), EDIT_ACTION)
            .await?;
    let location = owned.location();
    let form = LocationForm::from_location(location);
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(
        &flash,
        views::locations::edit_page(&frame, location, &form, &FormErrors::new()),
    ))
}

/// POST /location/{id}/edit/
/// DOCUMENTATION: Invalid input and (name, theme) collisions re-render the form
pub async fn edit_location(
    store: web::Data<Store>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
    form: web::Form<LocationForm>,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let owned = LocationService::get_guarded(store, &user.0, path.into_inner(), EDIT_ACTION).await?;

    let errors = match form.clean() {
        Ok(input) => match LocationService::update_location(store, &user.0, &owned, &input).await {
            Ok(_) => {
                return Ok(flash::redirect_with(
                    &theme_url(owned.theme().id),
                    FlashMessage::success(LOCATION_UPDATED),
                ))
            }
            Err(JournalError::UniquenessConflict(_)) => {
                let mut errors = FormErrors::new();
                errors.add_non_field(LOCATION_CONFLICT);
                errors
            }
            Err(e) => return Err(e),
        },
        Err(errors) => errors,
    };

    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(
        &flash,
        views::locations::edit_page(&frame, owned.location(), &form, &errors),
    ))
}

/// GET /location/{id}/delete/
pub async fn confirm_delete(
    store: web::Data<Store>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let owned = LocationService::get_guarded(store, &user.0, path.into_inner(), DELETE_ACTION).await?;
    let photo_count = LocationService::photo_count(store, owned.location()).await?;
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(
        &flash,
        views::locations::confirm_delete_page(&frame, owned.location(), photo_count),
    ))
}

/// POST /location/{id}/delete/
/// Delete the location together with every photo taken there
pub async fn delete_location(
    store: web::Data<Store>,
    media: web::Data<MediaStorage>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let theme_id = LocationService::delete_location(
        store.get_ref().as_ref(),
        media.get_ref().as_ref(),
        &user.0,
        path.into_inner(),
    )
    .await?;
    Ok(flash::redirect_with(
        &theme_url(theme_id),
        FlashMessage::success(LOCATION_DELETED),
    ))
}

/// Configuration for location routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/location/{id}/edit/")
            .route(web::get().to(edit_form))
            .route(web::post().to(edit_location)),
    )
    .service(
        web::resource("/location/{id}/delete/")
            .route(web::get().to(confirm_delete))
            .route(web::post().to(delete_location)),
    );
}
