//! HTTP handlers for shipment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Shipment;
use crate::services::shipment::{CreateShipmentInput, ShipmentRetraction, ShipmentService};
use crate::AppState;

/// Record a shipment
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(input): Json<CreateShipmentInput>,
) -> AppResult<(StatusCode, Json<Shipment>)> {
    let service = ShipmentService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let shipment = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// Retract a shipment, reversing its inventory effect
pub async fn retract_shipment(
    State(state): State<AppState>,
    Path(shipment_id): Path<Uuid>,
) -> AppResult<Json<ShipmentRetraction>> {
    let service = ShipmentService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let retraction = service.retract(shipment_id).await?;
    Ok(Json(retraction))
}

/// List all shipments
pub async fn list_shipments(State(state): State<AppState>) -> AppResult<Json<Vec<Shipment>>> {
    let service = ShipmentService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let shipments = service.list().await?;
    Ok(Json(shipments))
}

/// Get a single shipment
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(shipment_id): Path<Uuid>,
) -> AppResult<Json<Shipment>> {
    let service = ShipmentService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let shipment = service.get(shipment_id).await?;
    Ok(Json(shipment))
}
