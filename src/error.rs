//! Error taxonomy for the HTTP API.
//!
//! Every variant maps to one status code and a `{success: false, message}`
//! JSON body. Only `Internal` carries detail, and that detail goes to the log,
//! never to the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::repo::RepoError;
use crate::auth::MIN_PASSWORD_LEN;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password too short: it must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Invalid request body")]
    MalformedBody(#[source] JsonRejection),
    #[error("Email already exists")]
    EmailTaken,
    #[error("User does not exist")]
    UnknownUser,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidEmail
            | AuthError::PasswordTooShort
            | AuthError::PasswordMismatch
            | AuthError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AuthError::UnknownUser | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Duplicate => AuthError::EmailTaken,
            RepoError::Db(e) => AuthError::Internal(anyhow::Error::new(e).context("user store")),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::MalformedBody(rejection)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AuthError::Internal(e) => error!(error = ?e, "request failed"),
            AuthError::MalformedBody(rejection) => {
                warn!(reason = %rejection.body_text(), "malformed request body")
            }
            _ => {}
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
