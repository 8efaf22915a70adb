// src/models/user.rs
// DOCUMENTATION: Accounts and sessions
// PURPOSE: User records plus the signup/login form DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::forms::FormErrors;

/// Registered account
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// argon2 PHC string, never rendered
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// Insert payload for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// POST /signup/ body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[serde(default)]
    #[validate(email, length(max = 254))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8))]
    pub password1: String,

    #[serde(default)]
    pub password2: String,
}

impl SignupForm {
    /// Trim text fields the way they are stored; passwords are left untouched
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
        self
    }

    /// Field rules plus the checks that span fields
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => e.into(),
        };

        if !self.username.is_empty() && !is_valid_username(&self.username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if self.password2.is_empty() {
            errors.add("password2", crate::forms::REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result()
    }
}

/// Letters, digits and @.+-_ only
pub fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// POST /accounts/login/ body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, password1: &str, password2: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: "hana@example.com".to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup("hana", "correct horse", "correct horse").clean().is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        let errors = signup("hana", "correct horse", "battery staple")
            .clean()
            .unwrap_err();
        assert_eq!(
            errors.field("password2"),
            &["The two password fields didn't match.".to_string()]
        );
    }

    #[test]
    fn test_short_password_and_bad_username() {
        let errors = signup("ha na", "short", "short").clean().unwrap_err();
        assert!(errors.has("password1"));
        assert!(errors.has("username"));
    }

    #[test]
    fn test_bad_email() {
        let mut form = signup("hana", "correct horse", "correct horse");
        form.email = "not-an-email".to_string();
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.field("email"), &["Enter a valid email address.".to_string()]);
    }

    #[test]
    fn test_email_longer_than_column_is_a_field_error() {
        let mut form = signup("hana", "correct horse", "correct horse");
        form.email = format!("{}@{}example.com", "a".repeat(60), format!("{}.", "b".repeat(60)).repeat(3));
        assert_eq!(form.email.len(), 255);
        let errors = form.clean().unwrap_err();
        assert!(errors
            .field("email")
            .contains(&"Ensure this value has at most 254 characters.".to_string()));
    }

    #[test]
    fn test_username_charset() {
        assert!(is_valid_username("a.b+c-d_e@f"));
        assert!(!is_valid_username("semi;colon"));
    }
}
