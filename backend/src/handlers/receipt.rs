//! HTTP handlers for receipt endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Receipt;
use crate::services::receipt::{CreateReceiptInput, ReceiptService};
use crate::AppState;

/// Record a receipt
pub async fn create_receipt(
    State(state): State<AppState>,
    Json(input): Json<CreateReceiptInput>,
) -> AppResult<(StatusCode, Json<Receipt>)> {
    let service = ReceiptService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let receipt = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// List all receipts
pub async fn list_receipts(State(state): State<AppState>) -> AppResult<Json<Vec<Receipt>>> {
    let service = ReceiptService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let receipts = service.list().await?;
    Ok(Json(receipts))
}

/// Get a single receipt
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
) -> AppResult<Json<Receipt>> {
    let service = ReceiptService::new(state.db, state.locks, state.config.ledger.lock_timeout());
    let receipt = service.get(receipt_id).await?;
    Ok(Json(receipt))
}
