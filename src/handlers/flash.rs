// src/handlers/flash.rs
// DOCUMENTATION: One-shot messages carried across a redirect
// PURPOSE: Write the flash cookie on redirect, read and clear it on the next page

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{ready, Ready};

use crate::errors::JournalError;
use crate::views::FlashMessage;

pub const FLASH_COOKIE: &str = "flash";

/// Messages left by the previous response
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Vec<FlashMessage>);

impl IncomingFlash {
    fn from_cookie_value(value: &str) -> Vec<FlashMessage> {
        let decoded = match urlencoding::decode(value) {
            Ok(decoded) => decoded,
            Err(_) => return Vec::new(),
        };
        serde_json::from_str(&decoded).unwrap_or_else(|e| {
            log::warn!("Discarding unreadable flash cookie: {}", e);
            Vec::new()
        })
    }
}

impl FromRequest for IncomingFlash {
    type Error = JournalError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let messages = req
            .cookie(FLASH_COOKIE)
            .map(|c| Self::from_cookie_value(c.value()))
            .unwrap_or_default();
        ready(Ok(IncomingFlash(messages)))
    }
}

fn flash_cookie(messages: &[FlashMessage]) -> Cookie<'static> {
    let value = serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string());
    Cookie::build(FLASH_COOKIE, urlencoding::encode(&value).into_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// 303 to `location`
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 303 to `location` with a message for the next page
pub fn redirect_with(location: &str, message: FlashMessage) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(flash_cookie(&[message]))
        .finish()
}

/// 200 HTML page; consumes the incoming flash messages
pub fn html(flash: &IncomingFlash, body: String) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    if !flash.0.is_empty() {
        builder.cookie(removal_cookie());
    }
    builder.body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_cookie_round_trip_through_request() {
        let cookie = flash_cookie(&[FlashMessage::success("Photo uploaded successfully.")]);
        let req = TestRequest::default().cookie(cookie).to_http_request();
        let flash = IncomingFlash::extract(&req).await.unwrap();
        assert_eq!(flash.0, vec![FlashMessage::success("Photo uploaded successfully.")]);
    }

    #[actix_web::test]
    async fn test_garbage_cookie_is_ignored() {
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, "not-json"))
            .to_http_request();
        let flash = IncomingFlash::extract(&req).await.unwrap();
        assert!(flash.0.is_empty());
    }

    #[test]
    fn test_page_clears_consumed_flash() {
        let flash = IncomingFlash(vec![FlashMessage::error("x")]);
        let resp = html(&flash, "<p>ok</p>".to_string());
        let cleared = resp.cookies().any(|c| c.name() == FLASH_COOKIE && c.value().is_empty());
        assert!(cleared);

        let resp = html(&IncomingFlash::default(), String::new());
        assert_eq!(resp.cookies().count(), 0);
    }
}
