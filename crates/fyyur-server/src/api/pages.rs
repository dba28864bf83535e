use axum::{http::StatusCode, Json};
use serde::Serialize;

use super::Page;
use crate::error::ErrorPage;

#[derive(Serialize)]
pub struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

/// GET /
pub async fn home() -> Json<Page<()>> {
    Json(Page::new("home", ()))
}

/// GET /healthz
pub async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorPage>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorPage {
            status: StatusCode::NOT_FOUND.as_u16(),
            error: "Not Found",
        }),
    )
}
