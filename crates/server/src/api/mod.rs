//! # HTTP View Binding
//!
//! JSON routes over the shared `CatalogStore`. Handlers only translate
//! store outcomes into status codes; no catalog logic lives here.

pub mod catalog;
pub mod view;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Error body for non-2xx responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
        (
            status,
            Json(ApiError {
                message: message.into(),
            }),
        )
            .into_response()
    }
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Felis", description = "Cat breed catalog"),
    paths(
        catalog::get_catalog,
        catalog::refresh_catalog,
        catalog::catalog_events,
        catalog::get_item,
        catalog::add_item,
        catalog::delete_item,
        catalog::toggle_favorite,
        view::set_filter,
        view::toggle_filter,
        view::go_to_page,
        view::next_page,
        view::prev_page,
        view::set_page_size,
    ),
    components(schemas(
        ApiError,
        view::FilterRequest,
        view::PageRequest,
        view::PageSizeRequest
    )),
    tags(
        (name = "catalog", description = "Catalog listing and refresh"),
        (name = "items", description = "Single items"),
        (name = "view", description = "Filter and paging")
    )
)]
pub struct ApiDoc;

/// OpenAPI document for all routes
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
