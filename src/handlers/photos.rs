// src/handlers/photos.rs
// DOCUMENTATION: HTTP handlers for photo deletion
// PURPOSE: Confirm on GET, delete on POST; only the uploader gets through

use actix_web::{web, HttpResponse};

use crate::db::Store;
use crate::errors::JournalError;
use crate::handlers::extractors::CurrentUser;
use crate::handlers::flash::{self, IncomingFlash};
use crate::handlers::themes::theme_url;
use crate::services::{MediaStorage, PhotoService};
use crate::views::{self, FlashMessage, PageFrame};

pub const PHOTO_DELETED: &str = "Photo deleted successfully.";

/// GET /photo/{id}/delete/
pub async fn confirm_delete(
    store: web::Data<Store>,
    media: web::Data<MediaStorage>,
    user: CurrentUser,
    flash: IncomingFlash,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let photo = PhotoService::get_guarded(store.get_ref().as_ref(), &user.0, path.into_inner()).await?;
    let url = media.url(&photo.image);
    let frame = PageFrame::new(Some(&user.0), flash.0.clone());
    Ok(flash::html(
        &flash,
        views::photos::confirm_delete_page(&frame, &photo, &url),
    ))
}

/// POST /photo/{id}/delete/
pub async fn delete_photo(
    store: web::Data<Store>,
    media: web::Data<MediaStorage>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, JournalError> {
    let theme_id = PhotoService::delete_photo(
        store.get_ref().as_ref(),
        media.get_ref().as_ref(),
        &user.0,
        path.into_inner(),
    )
    .await?;
    Ok(flash::redirect_with(
        &theme_url(theme_id),
        FlashMessage::success(PHOTO_DELETED),
    ))
}

/// Configuration for photo routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/photo/{id}/delete/")
            .route(web::get().to(confirm_delete))
            .route(web::post().to(delete_photo)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::JournalStore;
    use crate::handlers::flash::FLASH_COOKIE;
    use crate::handlers::test_support::TestContext;
    use crate::models::{LocationChoice, NewLocation, NewPhoto, Photo, User};
    use crate::services::StorageBackend;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use chrono::Utc;

    async fn photo_by(ctx: &TestContext, owner: &User, uploader: &User) -> Photo {
        let theme = ctx.store.create_theme(owner.id, "Trip").await.unwrap();
        let photo = ctx
            .store
            .create_photo(
                &NewPhoto {
                    image: "photos/p.png".to_string(),
                    caption: "pier".to_string(),
                    taken_at: Utc::now(),
                    user_id: uploader.id,
                },
                &LocationChoice::New(NewLocation {
                    theme_id: theme.id,
                    name: "Pier".to_string(),
                    latitude: 10.0,
                    longitude: 20.0,
                }),
            )
            .await
            .unwrap();
        ctx.media.save(&photo.image, b"png").await.unwrap();
        photo
    }

    #[actix_web::test]
    async fn test_non_uploader_is_forbidden() {
        let ctx = TestContext::new();
        let owner = ctx.user("owner").await;
        let photo = photo_by(&ctx, &owner, &owner).await;
        let (_, cookie) = ctx.logged_in("intruder").await;
        let app = test::init_service(ctx.app()).await;

        for req in [
            test::TestRequest::get(),
            test::TestRequest::post(),
        ] {
            let req = req
                .uri(&format!("/photo/{}/delete/", photo.id))
                .cookie(cookie.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        }
        assert!(ctx.store.get_photo(photo.id).await.is_ok());
        assert_eq!(ctx.media.keys().await, vec![photo.image.clone()]);
    }

    #[actix_web::test]
    async fn test_uploader_deletes_with_flash() {
        let ctx = TestContext::new();
        let (owner, cookie) = ctx.logged_in("owner").await;
        let photo = photo_by(&ctx, &owner, &owner).await;
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::get()
            .uri(&format!("/photo/{}/delete/", photo.id))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/photo/{}/delete/", photo.id))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            theme_url(photo.theme_id)
        );
        let flash_cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .map(|c| c.into_owned())
            .expect("flash cookie");

        assert!(matches!(
            ctx.store.get_photo(photo.id).await,
            Err(JournalError::NotFound(_))
        ));
        assert!(ctx.media.keys().await.is_empty());

        let req = test::TestRequest::get()
            .uri(&theme_url(photo.theme_id))
            .cookie(cookie)
            .cookie(flash_cookie)
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(String::from_utf8_lossy(&body).contains(PHOTO_DELETED));
    }
}
