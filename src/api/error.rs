//! API error taxonomy and its JSON rendering.

use crate::models::BracketError;
use crate::store::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

/// Errors returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// No session.
    Unauthorized,
    /// Sign-in with an unknown username or the wrong secret.
    BadCredentials,
    /// Signed in but not an admin.
    Forbidden,
    /// Malformed body, unknown game or player id.
    Validation(String),
    /// Lock race lost, save on a locked bracket, duplicate username.
    Conflict(String),
    /// Mutation after the prediction deadline.
    DeadlinePassed,
    NotFound(String),
    /// Storage or encoding failure; details are logged, not returned.
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Sign in required"),
            ApiError::BadCredentials => write!(f, "Unknown username or wrong secret"),
            ApiError::Forbidden => write!(f, "Admin access required"),
            ApiError::Validation(msg) | ApiError::Conflict(msg) | ApiError::NotFound(msg) => {
                write!(f, "{}", msg)
            }
            ApiError::DeadlinePassed => write!(f, "The prediction deadline has passed"),
            ApiError::Internal(_) => write!(f, "Internal server error"),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::BadCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden | ApiError::DeadlinePassed => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(detail) = self {
            log::error!("{}", detail);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyLocked | StoreError::UsernameTaken(_) => ApiError::Conflict(e.to_string()),
            StoreError::IncompletePicks(_) => ApiError::Validation(e.to_string()),
            StoreError::Sqlite(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<BracketError> for ApiError {
    fn from(e: BracketError) -> Self {
        match e {
            BracketError::Locked => ApiError::Conflict(e.to_string()),
            BracketError::DeadlinePassed => ApiError::DeadlinePassed,
            BracketError::IncompletePicks { .. }
            | BracketError::UnknownGame(_)
            | BracketError::UnknownPlayer(_)
            | BracketError::IneligibleWinner { .. } => ApiError::Validation(e.to_string()),
            BracketError::Sink(_) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::BadCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::DeadlinePassed.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(StoreError::AlreadyLocked).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(BracketError::UnknownGame("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let e = ApiError::Internal("disk I/O error".into());
        assert_eq!(e.to_string(), "Internal server error");
    }
}
