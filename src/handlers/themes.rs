// src/handlers/themes.rs
// DOCUMENTATION: HTTP handlers for themes and photo upload
// PURPOSE: Parse requests, call services, render pages or redirect

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::db::Store;
use crate::errors::JournalError;
use crate::forms::{FormErrors, UploadFormValues, UploadSubmission};
use crate::handlers::extractors::CurrentUser;
use crate::handlers::flash::{self, IncomingFlash};
use crate::models::ThemeForm;
use crate::services::{MediaStorage, PhotoUploadService, ThemeService, UploadOutcome};
use crate::views::{self, upload::UploadPage, FlashMessage, PageFrame};

pub const PHOTO_UPLOADED: &str = "Photo uploaded successfully.";

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Location to open the form with
    pub location: Option<String>,
}

/// Where a theme's detail page lives
pub fn theme_url(theme_id: i64) -> String {
    format!("/theme/{}/", theme_id)
}

/// GET /
/// The requester's themes
pub async fn home(
    store: web::Data<Store>,
    user: CurrentUser,
    flash: IncomingFlash,
) -> Result<HttpResponse, JournalError> {
    let themes = ThemeService::list_themes(store.get_ref().as_ref(), &user.0).await?;
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(
        &flash,
        views::themes::home_page(&frame, &themes, "", &FormErrors::new()),
    ))
}

/// POST /
/// Create a theme from the inline form on the home page
pub async fn home_create(
    store: web::Data<Store>,
    user: CurrentUser,
    flash: IncomingFlash,
    form: web::Form<ThemeForm>,
) -> Result<HttpResponse, JournalError> {
    match form.clean() {
        Ok(name) => {
            ThemeService::create_theme(store.get_ref().as_ref(), &user.0, &name).await?;
            Ok(flash::redirect("/"))
        }
        Err(errors) => {
            let themes = ThemeService::list_themes(store.get_ref().as_ref(), &user.0).await?;
            let frame = PageFrame::new(Some(&user.0), flash.0.clone());
            Ok(flash::html(
                &flash,
                views::themes::home_page(&frame, &themes, &form.name, &errors),
            ))
        }
    }
}

/// GET /theme/create/
pub async fn create_form(user: CurrentUser, flash: IncomingFlash) -> HttpResponse {
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    flash::html(
        &flash,
        views::themes::create_page(&frame, "", &FormErrors::new()),
    )
}

/// POST /theme/create/
/// Create a theme owned by the requester and return to the theme list
pub async fn create_theme(
    store: web::Data<Store>,
    user: CurrentUser,
    flash: IncomingFlash,
    form: web::Form<ThemeForm>,
) -> Result<HttpResponse, JournalError> {
    match form.clean() {
        Ok(name) => {
            ThemeService::create_theme(store.get_ref().as_ref(), &user.0, &name).await?;
            Ok(flash::redirect("/"))
        }
        Err(errors) => {
            let frame = PageFrame::new(Some(&user.0), flash.0.clone());
            Ok(flash::html(
                &flash,
                views::themes::create_page(&frame, &form.name, &errors),
            ))
        }
    }
}

/// GET /theme/{id}/
pub async fn theme_detail(
    store: web::Data<Store>,
    media: web::Data<MediaStorage>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let theme = ThemeService::get_owned_theme(store, &user.0, path.into_inner()).await?;
    let detail = ThemeService::get_detail(store, theme).await?;
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(
        &flash,
        views::themes::detail_page(&frame, &detail, media.get_ref().as_ref()),
    ))
}

/// GET /theme/{id}/upload/
/// DOCUMENTATION: `?location=<id>` pre-selects one of the theme's locations
pub async fn upload_form(
    store: web::Data<Store>,
    config: web::Data<Config>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
    query: web::Query<UploadQuery>,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let theme = ThemeService::get_owned_theme(store, &user.0, path.into_inner()).await?;
    let locations = PhotoUploadService::theme_locations(store, &theme).await?;

    let requested = query
        .location
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok());
    let initial_location = requested.and_then(|id| locations.iter().find(|l| l.id == id));

    let values = UploadFormValues::default();
    let errors = FormErrors::new();
    let page = UploadPage {
        theme: &theme,
        locations: &locations,
        values: &values,
        errors: &errors,
        initial_location,
        maps_api_key: &config.google_maps_api_key,
    };
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(&flash, page.render(&frame)))
}

/// POST /theme/{id}/upload/
/// Store the photo, creating its location when none was selected
pub async fn upload_photo(
    store: web::Data<Store>,
    media: web::Data<MediaStorage>,
    config: web::Data<Config>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse, JournalError> {
    let store = store.get_ref().as_ref();
    let theme = ThemeService::get_owned_theme(store, &user.0, path.into_inner()).await?;
    let submission = UploadSubmission::from_multipart(payload, config.max_upload_bytes).await?;

    let outcome = PhotoUploadService::upload(
        store,
        media.get_ref().as_ref(),
        &user.0,
        &theme,
        &submission,
        config.max_upload_bytes,
    )
    .await?;

    let rejection = match outcome {
        UploadOutcome::Uploaded(_) => {
            return Ok(flash::redirect_with(
                &theme_url(theme.id),
                FlashMessage::success(PHOTO_UPLOADED),
            ))
        }
        UploadOutcome::Rejected(rejection) => rejection,
    };

    let locations = PhotoUploadService::theme_locations(store, &theme).await?;
    let page = UploadPage {
        theme: &theme,
        locations: &locations,
        values: &submission.values,
        errors: &rejection.errors,
        initial_location: rejection.selected.as_ref(),
        maps_api_key: &config.google_maps_api_key,
    };
    let mut frame = PageFrame::new(Some(&user.0), flash.0.clone());
    if let Some(message) = rejection.message {
        frame = frame.with_message(FlashMessage::error(message));
    }
    Ok(flash::html(&flash, page.render(&frame)))
}

/// Configuration for theme routes
/// DOCUMENTATION: /theme/create/ is registered before /theme/{id}/
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(home))
            .route(web::post().to(home_create)),
    )
    .service(
        web::resource("/theme/create/")
            .route(web::get().to(create_form))
            .route(web::post().to(create_theme)),
    )
    .route("/theme/{id}/", web::get().to(theme_detail))
    .service(
        web::resource("/theme/{id}/upload/")
            .route(web::get().to(upload_form))
            .route(web::post().to(upload_photo)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::JournalStore;
    use crate::forms::PNG_BYTES;
    use crate::handlers::test_support::{multipart_body, TestContext};
    use crate::models::NewLocation;
    use crate::services::upload_service::DUPLICATE_LOCATION_ERROR;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;

    #[actix_web::test]
    async fn test_anonymous_is_sent_to_login() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::get().uri("/theme/3/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/accounts/login/?next=%2Ftheme%2F3%2F"
        );
    }

    #[actix_web::test]
    async fn test_create_theme_then_listed() {
        let ctx = TestContext::new();
        let (user, cookie) = ctx.logged_in("hana").await;
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::post()
            .uri("/theme/create/")
            .cookie(cookie.clone())
            .set_form([("name", "  Kyoto temples  ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

        let themes = ctx.store.list_themes_by_user(user.id).await.unwrap();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].name, "Kyoto temples");

        let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(String::from_utf8_lossy(&body).contains("Kyoto temples"));
    }

    #[actix_web::test]
    async fn test_blank_theme_name_rerenders() {
        let ctx = TestContext::new();
        let (user, cookie) = ctx.logged_in("hana").await;
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::post()
            .uri("/theme/create/")
            .cookie(cookie)
            .set_form([("name", "   ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("errorlist"));
        assert!(ctx.store.list_themes_by_user(user.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_other_users_theme_is_not_found() {
        let ctx = TestContext::new();
        let owner = ctx.user("owner").await;
        let theme = ctx.store.create_theme(owner.id, "Private").await.unwrap();
        let (_, cookie) = ctx.logged_in("intruder").await;
        let app = test::init_service(ctx.app()).await;

        for uri in [
            format!("/theme/{}/", theme.id),
            format!("/theme/{}/upload/", theme.id),
            format!("/theme/{}/map/", theme.id),
        ] {
            let req = test::TestRequest::get().uri(&uri).cookie(cookie.clone()).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_upload_form_preselects_location() {
        let ctx = TestContext::new();
        let (user, cookie) = ctx.logged_in("hana").await;
        let theme = ctx.store.create_theme(user.id, "Kyoto").await.unwrap();
        let location = ctx
            .store
            .create_location(&NewLocation {
                theme_id: theme.id,
                name: "Gion".to_string(),
                latitude: 35.0037,
                longitude: 135.7788,
            })
            .await
            .unwrap();
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::get()
            .uri(&format!("/theme/{}/upload/?location={}", theme.id, location.id))
            .cookie(cookie)
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains(&format!(
            r#"const initialLocation = {{"id":{},"name":"Gion","latitude":35.0037,"longitude":135.7788}};"#,
            location.id
        )));
        assert!(body.contains("key=test-maps-key"));
    }

    #[actix_web::test]
    async fn test_upload_creates_location_and_photo() {
        let ctx = TestContext::new();
        let (user, cookie) = ctx.logged_in("hana").await;
        let theme = ctx.store.create_theme(user.id, "Kyoto").await.unwrap();
        let app = test::init_service(ctx.app()).await;

        let (content_type, body) = multipart_body(
            &[
                ("caption", "Lanterns"),
                ("taken_at", "2024-04-01T19:30"),
                ("location", ""),
                ("name", "Yasaka"),
                ("latitude", "35.0036"),
                ("longitude", "135.7785"),
            ],
            Some(("image", "lanterns.png", PNG_BYTES)),
        );
        let req = test::TestRequest::post()
            .uri(&format!("/theme/{}/upload/", theme.id))
            .cookie(cookie)
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            theme_url(theme.id)
        );

        let photos = ctx.store.list_photos_by_theme(theme.id).await.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].caption, "Lanterns");
        let locations = ctx.store.list_locations_by_theme(theme.id).await.unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "Yasaka");
        assert_eq!(ctx.media.keys().await, vec![photos[0].image.clone()]);
    }

    #[actix_web::test]
    async fn test_upload_duplicate_location_rerenders() {
        let ctx = TestContext::new();
        let (user, cookie) = ctx.logged_in("hana").await;
        let theme = ctx.store.create_theme(user.id, "Kyoto").await.unwrap();
        ctx.store
            .create_location(&NewLocation {
                theme_id: theme.id,
                name: "Yasaka".to_string(),
                latitude: 35.0,
                longitude: 135.7,
            })
            .await
            .unwrap();
        let app = test::init_service(ctx.app()).await;

        let (content_type, body) = multipart_body(
            &[
                ("taken_at", "2024-04-01T19:30"),
                ("name", "Yasaka"),
                ("latitude", "35.1"),
                ("longitude", "135.8"),
            ],
            Some(("image", "lanterns.png", PNG_BYTES)),
        );
        let req = test::TestRequest::post()
            .uri(&format!("/theme/{}/upload/", theme.id))
            .cookie(cookie)
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains(DUPLICATE_LOCATION_ERROR));
        assert!(ctx.store.list_photos_by_theme(theme.id).await.unwrap().is_empty());
        assert!(ctx.media.keys().await.is_empty());
    }
}
