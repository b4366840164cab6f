use axum::extract::FromRequest;

use crate::error::AuthError;

/// `Json` whose rejection is an [`AuthError`], so bad bodies get the same
/// `{success, message}` shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct ApiJson<T>(pub T);
