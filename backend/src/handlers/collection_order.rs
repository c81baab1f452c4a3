//! HTTP handlers for collection order endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::CollectionOrder;
use crate::services::collection_order::{CollectionOrderService, CreateOrderInput};
use crate::AppState;

/// Record a collection order
pub async fn create_collection_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<(StatusCode, Json<CollectionOrder>)> {
    let service =
        CollectionOrderService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let order = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List all collection orders
pub async fn list_collection_orders(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CollectionOrder>>> {
    let service =
        CollectionOrderService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let orders = service.list().await?;
    Ok(Json(orders))
}

/// Get a single collection order
pub async fn get_collection_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<CollectionOrder>> {
    let service =
        CollectionOrderService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let order = service.get(order_id).await?;
    Ok(Json(order))
}
