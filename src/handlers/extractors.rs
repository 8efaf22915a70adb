// src/handlers/extractors.rs
// DOCUMENTATION: Request extractors
// PURPOSE: Resolve the session cookie to the acting user

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::config::Config;
use crate::db::Store;
use crate::errors::JournalError;
use crate::models::User;
use crate::services::AuthService;

/// Authenticated user extractor.
/// DOCUMENTATION: Anonymous or expired sessions fail with LoginRequired,
/// which answers with a redirect to the login page
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Path plus query of the request, used as the login `next`
fn requested_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}

async fn session_user(req: &HttpRequest) -> Result<Option<User>, JournalError> {
    let store = req
        .app_data::<web::Data<Store>>()
        .ok_or_else(|| JournalError::InternalError("Store is not configured".to_string()))?;
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| JournalError::InternalError("Config is not configured".to_string()))?;

    let Some(cookie) = req.cookie(&config.session_cookie_name) else {
        return Ok(None);
    };
    AuthService::session_user(store.get_ref().as_ref(), cookie.value()).await
}

impl FromRequest for CurrentUser {
    type Error = JournalError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match session_user(&req).await? {
                Some(user) => Ok(CurrentUser(user)),
                None => Err(JournalError::LoginRequired(requested_path(&req))),
            }
        })
    }
}
