use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::resource_service::{ResourceQuery, ResourceUpdate};
use crate::services::{Resource, ResourceService};

#[derive(Debug, Deserialize)]
pub struct CreateResourceRequest {
    pub title: String,
    pub description: String,
    pub value: i32,
}

/// POST /api/resources
pub async fn create_resource(
    Json(payload): Json<CreateResourceRequest>,
) -> ApiResult<Resource> {
    let resource = ResourceService::new()?
        .create_resource(&payload.title, &payload.description, payload.value)
        .await?;

    Ok(ApiResponse::created(resource))
}

/// GET /api/resources - List resources, optionally filtered by title/value
pub async fn list_resources(Query(query): Query<ResourceQuery>) -> ApiResult<Vec<Resource>> {
    let resources = ResourceService::new()?.get_resources(&query).await?;
    Ok(ApiResponse::success(resources))
}

/// GET /api/resources/:id
pub async fn get_resource(Path(id): Path<Uuid>) -> ApiResult<Resource> {
    let resource = ResourceService::new()?.get_resource(id).await?;
    Ok(ApiResponse::success(resource))
}

/// PATCH /api/resources/:id
pub async fn update_resource(
    Path(id): Path<Uuid>,
    Json(update): Json<ResourceUpdate>,
) -> ApiResult<Resource> {
    let resource = ResourceService::new()?.update_resource(id, &update).await?;
    Ok(ApiResponse::success(resource))
}

/// DELETE /api/resources/:id - Admin only
pub async fn delete_resource(Path(id): Path<Uuid>) -> ApiResult<Value> {
    ResourceService::new()?.delete_resource(id).await?;
    Ok(ApiResponse::success(json!({
        "message": format!("Resource with id: {} was successfully deleted", id)
    })))
}
