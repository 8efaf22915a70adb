// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for accounts
// PURPOSE: Signup, login, and logout with a database-backed session cookie

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::db::{Store, USERNAME_CONFLICT};
use crate::errors::JournalError;
use crate::forms::FormErrors;
use crate::handlers::flash::{self, IncomingFlash};
use crate::models::{LoginForm, SignupForm, User};
use crate::services::AuthService;
use crate::views::{self, PageFrame};

pub const LOGIN_FAILED: &str = "Please enter a correct username and password.";

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login
/// DOCUMENTATION: Browsers drop tabs and newlines from URLs, so any control
/// or whitespace character could turn "/\t/host" into "//host"
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(|c| c.is_control() || c.is_whitespace()) =>
        {
            path
        }
        _ => "/",
    }
}

fn session_cookie(config: &Config, token: &str) -> Cookie<'static> {
    Cookie::build(config.session_cookie_name.clone(), token.to_string())
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(config.session_ttl_hours))
        .finish()
}

/// Open a session for `user` and redirect to `location` with the cookie set
async fn login_and_redirect(
    store: &Store,
    config: &Config,
    user: &User,
    location: &str,
) -> Result<HttpResponse, JournalError> {
    let token = AuthService::start_session(store.as_ref(), user, config.session_ttl_hours).await?;
    log::info!("User {} logged in", user.id);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(session_cookie(config, &token))
        .finish())
}

/// GET /signup/
pub async fn signup_form(flash: IncomingFlash) -> HttpResponse {
    let frame = PageFrame::new(None, flash.0.clone());
    flash::html(
        &flash,
        views::auth::signup_page(&frame, &SignupForm::default(), &FormErrors::new()),
    )
}

/// POST /signup/
/// Register, log the new user in, and go home
pub async fn signup(
    store: web::Data<Store>,
    config: web::Data<Config>,
    flash: IncomingFlash,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse, JournalError> {
    let form = form.into_inner().normalized();
    let frame = PageFrame::new(None, flash.0.clone());

    if let Err(errors) = form.clean() {
        return Ok(flash::html(&flash, views::auth::signup_page(&frame, &form, &errors)));
    }

    let user = match AuthService::signup(store.get_ref().as_ref(), &form).await {
        Ok(user) => user,
        Err(JournalError::UniquenessConflict(_)) => {
            let mut errors = FormErrors::new();
            errors.add("username", USERNAME_CONFLICT);
            return Ok(flash::html(&flash, views::auth::signup_page(&frame, &form, &errors)));
        }
        Err(e) => return Err(e),
    };

    login_and_redirect(store.get_ref(), &config, &user, "/").await
}

/// GET /accounts/login/
pub async fn login_form(flash: IncomingFlash, query: web::Query<NextQuery>) -> HttpResponse {
    let frame = PageFrame::new(None, flash.0.clone());
    let next = safe_next(query.next.as_deref());
    flash::html(
        &flash,
        views::auth::login_page(&frame, "", next, &FormErrors::new()),
    )
}

/// POST /accounts/login/
pub async fn login(
    store: web::Data<Store>,
    config: web::Data<Config>,
    flash: IncomingFlash,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, JournalError> {
    let form = form.into_inner();
    let next = safe_next(form.next.as_deref()).to_string();

    match AuthService::authenticate(store.get_ref().as_ref(), &form.username, &form.password).await? {
        Some(user) => login_and_redirect(store.get_ref(), &config, &user, &next).await,
        None => {
            let mut errors = FormErrors::new();
            errors.add_non_field(LOGIN_FAILED);
            let frame = PageFrame::new(None, flash.0.clone());
            Ok(flash::html(
                &flash,
                views::auth::login_page(&frame, form.username.trim(), &next, &errors),
            ))
        }
    }
}

/// GET /accounts/logout/
/// Drop the session row and the cookie
pub async fn logout(
    store: web::Data<Store>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<HttpResponse, JournalError> {
    if let Some(cookie) = req.cookie(&config.session_cookie_name) {
        AuthService::end_session(store.get_ref().as_ref(), cookie.value()).await?;
    }

    let mut removal = Cookie::build(config.session_cookie_name.clone(), "")
        .path("/")
        .finish();
    removal.make_removal();

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/accounts/login/"))
        .cookie(removal)
        .finish())
}

/// Configuration for account routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/signup/")
            .route(web::get().to(signup_form))
            .route(web::post().to(signup)),
    )
    .service(
        web::resource("/accounts/login/")
            .route(web::get().to(login_form))
            .route(web::post().to(login)),
    )
    .route("/accounts/logout/", web::get().to(logout));
}
