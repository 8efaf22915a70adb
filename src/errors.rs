// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::views;

/// Application-specific error types
/// DOCUMENTATION: Every handler aborts with one of these; none are retried
/// Form validation failures are not errors, they re-render the form instead
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    UniquenessConflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No valid session; carries the path the visitor asked for
    #[error("Login required")]
    LoginRequired(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl JournalError {
    pub fn not_found(what: &str, id: i64) -> Self {
        JournalError::NotFound(format!("No {} found with id {}", what, id))
    }

    /// Location the visitor is sent to when a session is missing
    pub fn login_redirect(next: &str) -> String {
        format!("/accounts/login/?next={}", urlencoding::encode(next))
    }
}

/// Convert JournalError to HTTP response
/// DOCUMENTATION: Maps error types to status codes and a small HTML error page
impl ResponseError for JournalError {
    fn error_response(&self) -> HttpResponse {
        if let JournalError::LoginRequired(next) = self {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, JournalError::login_redirect(next)))
                .finish();
        }

        let status = self.status_code();
        let message = match self {
            // Internal details stay in the log
            JournalError::DatabaseError(_)
            | JournalError::StorageError(_)
            | JournalError::InternalError(_) => {
                log::error!("{}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(views::layout::error_page(status, &message))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            JournalError::NotFound(_) => StatusCode::NOT_FOUND,
            JournalError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            JournalError::UniquenessConflict(_) => StatusCode::CONFLICT,
            JournalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            JournalError::LoginRequired(_) => StatusCode::SEE_OTHER,
            JournalError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JournalError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JournalError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            JournalError::not_found("theme", 3).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            JournalError::PermissionDenied("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            JournalError::UniquenessConflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_login_required_redirects_with_next() {
        let resp = JournalError::LoginRequired("/theme/4/".into()).error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/accounts/login/?next=%2Ftheme%2F4%2F");
    }

    #[actix_web::test]
    async fn test_internal_details_are_hidden() {
        let resp = JournalError::DatabaseError("relation photos does not exist".into())
            .error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("relation photos"));
        assert_eq!(
            JournalError::InvalidInput("bad part".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
