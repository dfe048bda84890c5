//! # Catalog API
//!
//! Listing, refresh, live updates, and per-item endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;

use felis_core::validation::ItemDraft;
use felis_core::{CatalogView, ItemLookup, LoadStatus, RefreshOutcome, StoreError};

use super::ApiError;
use crate::AppState;

/// Response of a manual refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
    pub view: CatalogView,
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_catalog))
        .route("/refresh", post(refresh_catalog))
        .route("/events", get(catalog_events))
}

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_item))
        .route("/:id", get(get_item).delete(delete_item))
        .route("/:id/favorite", post(toggle_favorite))
}

/// HTTP status for the result of a refresh
fn refresh_status(outcome: &RefreshOutcome) -> StatusCode {
    match outcome {
        RefreshOutcome::Loaded { .. } => StatusCode::OK,
        RefreshOutcome::AlreadyLoading => StatusCode::ACCEPTED,
        RefreshOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// HTTP status for a catalog read, given the auto-refresh it triggered
fn catalog_status(auto_refresh: Option<&RefreshOutcome>) -> StatusCode {
    match auto_refresh {
        Some(outcome @ RefreshOutcome::Failed { .. }) => refresh_status(outcome),
        _ => StatusCode::OK,
    }
}

/// Current page of the catalog, loading it first if nothing is loaded yet
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Current catalog view"),
        (status = 502, description = "Initial load failed; view carries loadError")
    )
)]
pub async fn get_catalog(State(state): State<AppState>) -> Response {
    let auto_refresh = if state.store.load_status() == LoadStatus::NotStarted {
        Some(state.store.refresh().await)
    } else {
        None
    };

    let status = catalog_status(auto_refresh.as_ref());
    (status, Json(state.store.snapshot())).into_response()
}

/// Re-fetch the remote listing and merge it
#[utoipa::path(
    post,
    path = "/api/v1/catalog/refresh",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog refreshed"),
        (status = 202, description = "A refresh was already in flight"),
        (status = 502, description = "Remote source failed; items unchanged")
    )
)]
pub async fn refresh_catalog(State(state): State<AppState>) -> Response {
    let outcome = state.store.refresh().await;
    let status = refresh_status(&outcome);

    let body = RefreshResponse {
        outcome,
        view: state.store.snapshot(),
    };
    (status, Json(body)).into_response()
}

/// SSE stream of catalog views: the current one, then one per change
#[utoipa::path(
    get,
    path = "/api/v1/catalog/events",
    tag = "catalog",
    responses((status = 200, description = "text/event-stream of catalog views"))
)]
pub async fn catalog_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = BroadcastStream::new(state.store.subscribe())
        .filter_map(|update| async move { update.ok() });

    let stream = stream::iter(vec![state.store.snapshot()])
        .chain(updates)
        .filter_map(|view| async move {
            match Event::default().event("catalog").json_data(&view) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    tracing::warn!("Failed to encode catalog event: {}", e);
                    None
                }
            }
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// One item, from local state or the remote source
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item"),
        (status = 404, description = "No such item", body = ApiError),
        (status = 502, description = "Remote lookup failed", body = ApiError)
    )
)]
pub async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.lookup(&id).await {
        ItemLookup::Found(item) => Json(item).into_response(),
        ItemLookup::NotFound => {
            ApiError::response(StatusCode::NOT_FOUND, format!("No cat with id '{}'", id))
        }
        ItemLookup::Failed(message) => ApiError::response(StatusCode::BAD_GATEWAY, message),
    }
}

/// Add a locally defined item
#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "items",
    responses(
        (status = 201, description = "Item added"),
        (status = 409, description = "Id already taken", body = ApiError),
        (status = 422, description = "Per-field validation errors")
    )
)]
pub async fn add_item(State(state): State<AppState>, Json(draft): Json<ItemDraft>) -> Response {
    match state.store.add_item(draft) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(StoreError::Validation(errors)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
        }
        Err(e @ StoreError::DuplicateId(_)) => {
            ApiError::response(StatusCode::CONFLICT, e.to_string())
        }
    }
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "No such item", body = ApiError)
    )
)]
pub async fn delete_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.store.delete_item(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        ApiError::response(StatusCode::NOT_FOUND, format!("No cat with id '{}'", id))
    }
}

/// Flip an item's favorite flag
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/favorite",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "The updated item"),
        (status = 404, description = "No such item", body = ApiError)
    )
)]
pub async fn toggle_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if !state.store.toggle_favorite(&id) {
        return ApiError::response(StatusCode::NOT_FOUND, format!("No cat with id '{}'", id));
    }

    match state.store.find(&id) {
        Some(item) => Json(item).into_response(),
        None => ApiError::response(StatusCode::NOT_FOUND, format!("No cat with id '{}'", id)),
    }
}
