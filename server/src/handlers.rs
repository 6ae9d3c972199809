//! Request handlers for the `/items` resource.
//!
//! Handlers parse the path id first, then validate the body, then call the
//! store. Delete is the exception and ignores its id. Any failure is returned as `ApiError` and rendered by the error
//! mapper.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use item_core::{
    strip_done, validate_for_create, validate_for_update, Item, ItemError, ItemId, ItemStore,
};
use serde_json::{json, Value};
use tracing::{debug, field, instrument, Span};

use crate::error::ApiError;

pub type SharedStore = Arc<dyn ItemStore>;

#[instrument(skip_all)]
pub async fn list_items(State(store): State<SharedStore>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = store.find_all().await?;
    debug!(count = items.len(), "listed items");
    Ok(Json(items))
}

/// Path segments axum cannot decode are malformed ids, not framework
/// rejections, so they still render as JSON.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<ItemId, ApiError> {
    let Path(raw_id) = path?;
    Span::current().record("id", raw_id.as_str());
    Ok(ItemId::parse(&raw_id)?)
}

#[instrument(skip_all, fields(id = field::Empty))]
pub async fn get_item(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = path_id(path)?;
    let item = store
        .find_by_id(&id)
        .await?
        .ok_or(ItemError::NotFound { id })?;
    Ok(Json(item))
}

/// Any `done` in the body is dropped before validation; new items always
/// start not done.
#[instrument(skip_all)]
pub async fn create_item(
    State(store): State<SharedStore>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(body) = body?;
    let new_item = validate_for_create(&strip_done(body))?;
    let item = store.create(new_item).await?;
    debug!(id = %item.id, "created item");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip_all, fields(id = field::Empty))]
pub async fn update_item(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = path_id(path)?;
    let Json(body) = body?;
    let patch = validate_for_update(&body)?;
    let item = store
        .update_by_id(&id, patch)
        .await?
        .ok_or(ItemError::NotFound { id })?;
    Ok(Json(item))
}

/// Placeholder: deletion is declared but not offered yet. Every request,
/// whatever the id, gets `NotImplemented`.
#[instrument(skip_all)]
pub async fn delete_item() -> Result<StatusCode, ApiError> {
    debug!("delete requested");
    Err(ItemError::not_implemented("delete").into())
}

pub async fn route_not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "route not found" })))
}

pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "method not allowed" })),
    )
}
