use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
    pub success: bool,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Hello Wonderlogy!" }))
        .route("/hello", get(hello))
}

pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello Wonderlogy!",
        success: true,
    })
}
