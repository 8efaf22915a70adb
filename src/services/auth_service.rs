// src/services/auth_service.rs
// DOCUMENTATION: Accounts and sessions
// PURPOSE: Signup, password checks, and session token lifecycle

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::db::JournalStore;
use crate::errors::JournalError;
use crate::models::{NewUser, SignupForm, User};

pub struct AuthService;

impl AuthService {
    /// Create an account from an already cleaned signup form
    pub async fn signup(store: &dyn JournalStore, form: &SignupForm) -> Result<User, JournalError> {
        let new_user = NewUser {
            username: form.username.clone(),
            email: form.email.clone(),
            password_hash: hash_password(&form.password1)?,
        };
        let user = store.create_user(&new_user).await?;
        log::info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// The user if `username` exists and `password` matches
    pub async fn authenticate(
        store: &dyn JournalStore,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, JournalError> {
        let Some(user) = store.get_user_by_username(username.trim()).await? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            log::info!("Failed login for {}", user.username);
            Ok(None)
        }
    }

    /// Open a session for `user` and return its token
    pub async fn start_session(
        store: &dyn JournalStore,
        user: &User,
        ttl_hours: i64,
    ) -> Result<String, JournalError> {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::hours(ttl_hours);
        store.create_session(&token, user.id, expires_at).await?;
        Ok(token)
    }

    pub async fn session_user(
        store: &dyn JournalStore,
        token: &str,
    ) -> Result<Option<User>, JournalError> {
        store.get_session_user(token, Utc::now()).await
    }

    pub async fn end_session(store: &dyn JournalStore, token: &str) -> Result<(), JournalError> {
        store.delete_session(token).await
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> Result<String, JournalError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| JournalError::InternalError(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash
fn verify_password(password: &str, hash: &str) -> Result<bool, JournalError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| JournalError::InternalError(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
