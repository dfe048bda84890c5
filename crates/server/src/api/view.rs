//! # View API
//!
//! Favorites filter and paging.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use felis_core::CatalogView;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub favorites_only: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PageRequest {
    pub page: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSizeRequest {
    pub page_size: usize,
}

pub fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/filter", put(set_filter))
        .route("/filter/toggle", post(toggle_filter))
        .route("/page", put(go_to_page))
        .route("/page/next", post(next_page))
        .route("/page/prev", post(prev_page))
        .route("/page-size", put(set_page_size))
}

#[utoipa::path(
    put,
    path = "/api/v1/view/filter",
    tag = "view",
    request_body = FilterRequest,
    responses((status = 200, description = "Updated catalog view"))
)]
pub async fn set_filter(
    State(state): State<AppState>,
    Json(req): Json<FilterRequest>,
) -> Json<CatalogView> {
    Json(state.store.set_filter_favorites_only(req.favorites_only))
}

#[utoipa::path(
    post,
    path = "/api/v1/view/filter/toggle",
    tag = "view",
    responses((status = 200, description = "Updated catalog view"))
)]
pub async fn toggle_filter(State(state): State<AppState>) -> Json<CatalogView> {
    Json(state.store.toggle_show_favorites())
}

/// Jump to a page; out-of-range pages are clamped
#[utoipa::path(
    put,
    path = "/api/v1/view/page",
    tag = "view",
    request_body = PageRequest,
    responses((status = 200, description = "Updated catalog view"))
)]
pub async fn go_to_page(
    State(state): State<AppState>,
    Json(req): Json<PageRequest>,
) -> Json<CatalogView> {
    Json(state.store.go_to_page(req.page))
}

#[utoipa::path(
    post,
    path = "/api/v1/view/page/next",
    tag = "view",
    responses((status = 200, description = "Updated catalog view"))
)]
pub async fn next_page(State(state): State<AppState>) -> Json<CatalogView> {
    Json(state.store.next_page())
}

#[utoipa::path(
    post,
    path = "/api/v1/view/page/prev",
    tag = "view",
    responses((status = 200, description = "Updated catalog view"))
)]
pub async fn prev_page(State(state): State<AppState>) -> Json<CatalogView> {
    Json(state.store.prev_page())
}

#[utoipa::path(
    put,
    path = "/api/v1/view/page-size",
    tag = "view",
    request_body = PageSizeRequest,
    responses(
        (status = 200, description = "Updated catalog view"),
        (status = 422, description = "Page size must be positive", body = ApiError)
    )
)]
pub async fn set_page_size(
    State(state): State<AppState>,
    Json(req): Json<PageSizeRequest>,
) -> Response {
    if req.page_size == 0 {
        return ApiError::response(StatusCode::UNPROCESSABLE_ENTITY, "pageSize must be positive");
    }
    Json(state.store.set_page_size(req.page_size)).into_response()
}
