//! HTTP handlers for material inventory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Material;
use crate::services::material::{
    CreateMaterialInput, InventorySummary, MaterialReconciliation, MaterialService,
};
use crate::AppState;

/// Register a material
pub async fn create_material(
    State(state): State<AppState>,
    Json(input): Json<CreateMaterialInput>,
) -> AppResult<(StatusCode, Json<Material>)> {
    let service = MaterialService::new(state.db);
    let material = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// List all materials
pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.db);
    let materials = service.list().await?;
    Ok(Json(materials))
}

/// Get a single material
pub async fn get_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.db);
    let material = service.get(material_id).await?;
    Ok(Json(material))
}

/// Delete a material without movement history
pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = MaterialService::new(state.db);
    service.delete(material_id).await?;
    Ok(Json(()))
}

/// Fleet-wide inventory summary
pub async fn material_summary(State(state): State<AppState>) -> AppResult<Json<InventorySummary>> {
    let service = MaterialService::new(state.db);
    let summary = service.summary().await?;
    Ok(Json(summary))
}

/// Reconcile a material row against its movement log
pub async fn material_reconciliation(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<MaterialReconciliation>> {
    let service = MaterialService::new(state.db);
    let reconciliation = service.reconcile(material_id).await?;
    Ok(Json(reconciliation))
}
