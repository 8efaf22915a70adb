// src/handlers/test_support.rs
// DOCUMENTATION: Shared fixtures for handler tests
// PURPOSE: An App wired to the in-memory store and media backend

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use std::sync::Arc;

use crate::config::{test_config, Config};
use crate::db::{MemoryStore, Store};
use crate::models::{SignupForm, User};
use crate::services::storage::MemoryStorage;
use crate::services::{AuthService, MediaStorage};

pub const PASSWORD: &str = "correct horse battery";

const BOUNDARY: &str = "journal-test-boundary";

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub media: Arc<MemoryStorage>,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            media: Arc::new(MemoryStorage::default()),
            config: test_config(),
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let store: Store = self.store.clone();
        let media: MediaStorage = self.media.clone();
        App::new()
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(media))
            .app_data(web::Data::new(self.config.clone()))
            .configure(super::routes)
    }

    /// Registered account with PASSWORD
    pub async fn user(&self, username: &str) -> User {
        let form = SignupForm {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password1: PASSWORD.to_string(),
            password2: PASSWORD.to_string(),
        };
        AuthService::signup(self.store.as_ref(), &form)
            .await
            .expect("signup")
    }

    /// Registered account plus a live session cookie for it
    pub async fn logged_in(&self, username: &str) -> (User, Cookie<'static>) {
        let user = self.user(username).await;
        let token = AuthService::start_session(self.store.as_ref(), &user, 1)
            .await
            .expect("session");
        let cookie = Cookie::new(self.config.session_cookie_name.clone(), token);
        (user, cookie)
    }
}

/// The session cookie a response set, if any
pub fn session_cookie_from<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    let name = test_config().session_cookie_name;
    resp.response()
        .cookies()
        .find(|c| c.name() == name && !c.value().is_empty())
        .map(|c| c.into_owned())
}

/// multipart/form-data body with text fields and an optional file part
/// DOCUMENTATION: Returns the Content-Type header value and the body bytes
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
