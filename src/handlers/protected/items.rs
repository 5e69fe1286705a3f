use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::item_service::{ItemQuery, ItemUpdate};
use crate::services::{Item, ItemService};

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub resource_id: Uuid,
    pub name: String,
    pub description: String,
}

/// POST /api/items
pub async fn create_item(Json(payload): Json<CreateItemRequest>) -> ApiResult<Item> {
    let item = ItemService::new()?
        .create_item(payload.resource_id, &payload.name, &payload.description)
        .await?;

    Ok(ApiResponse::created(item))
}

/// GET /api/items - List items, optionally filtered by resource/name
pub async fn list_items(Query(query): Query<ItemQuery>) -> ApiResult<Vec<Item>> {
    let items = ItemService::new()?.get_items(&query).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/items/:id
pub async fn get_item(Path(id): Path<Uuid>) -> ApiResult<Item> {
    let item = ItemService::new()?.get_item(id).await?;
    Ok(ApiResponse::success(item))
}

/// PATCH /api/items/:id
pub async fn update_item(Path(id): Path<Uuid>, Json(update): Json<ItemUpdate>) -> ApiResult<Item> {
    let item = ItemService::new()?.update_item(id, &update).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/items/:id - Admin only
pub async fn delete_item(Path(id): Path<Uuid>) -> ApiResult<Value> {
    ItemService::new()?.delete_item(id).await?;
    Ok(ApiResponse::success(json!({
        "message": format!("Item with id: {} was successfully deleted", id)
    })))
}
