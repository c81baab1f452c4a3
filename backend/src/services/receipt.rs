//! Receipt service: inbound movements
//!
//! A receipt runs the full evaluate-then-commit pipeline: take the material
//! and cap-window locks, load the snapshot and log aggregates, ask the
//! validation engine for a decision, then append to the log and increment
//! the inventory in one transaction.

use std::time::Duration;

use chrono::Local;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Receipt;
use shared::validation::{self, ReceiptContext, ReceiptRequest, RuleViolation};

use crate::error::{AppError, AppResult};
use crate::ledger::locks::{self, LockRegistry};
use crate::ledger::movements::ReceiptRow;
use crate::ledger::{inventory, movements, LedgerTxn};
use crate::services::master_data::find_staff_id_by_cpf;

/// Input for recording a receipt
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceiptInput {
    pub weight: Decimal,
    pub volume: Decimal,
    pub material_id: Uuid,
    pub staff_cpf: String,
}

/// Receipt service
#[derive(Clone)]
pub struct ReceiptService {
    db: PgPool,
    locks: LockRegistry,
    lock_timeout: Duration,
}

impl ReceiptService {
    pub fn new(db: PgPool, locks: LockRegistry, lock_timeout: Duration) -> Self {
        Self {
            db,
            locks,
            lock_timeout,
        }
    }

    /// Record a receipt and increment the material's inventory.
    pub async fn create(&self, input: CreateReceiptInput) -> AppResult<Receipt> {
        let today = Local::now().date_naive();

        // The staff and day keys serialize the cap checks, which span
        // materials; the material key serializes the inventory mutation.
        let keys = [
            locks::material_key(input.material_id),
            locks::receipt_staff_key(&input.staff_cpf),
            locks::receipt_day_key(today),
        ];
        let mut txn = LedgerTxn::begin(&self.db, &self.locks, &keys, self.lock_timeout).await?;

        let material = inventory::find_snapshot(txn.conn(), input.material_id).await?;
        let staff_id = find_staff_id_by_cpf(txn.conn(), &input.staff_cpf).await?;

        let (staff_month_total_kg, day_total_kg) = match staff_id {
            Some(staff_id) => (
                movements::staff_month_receipt_total(txn.conn(), staff_id, today).await?,
                movements::day_receipt_total(txn.conn(), today).await?,
            ),
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        let request = ReceiptRequest {
            weight_kg: input.weight,
            volume_m3: input.volume,
        };
        let ctx = ReceiptContext {
            material,
            staff_exists: staff_id.is_some(),
            staff_month_total_kg,
            day_total_kg,
        };
        validation::evaluate_receipt(&request, &ctx)?;

        // Unreachable after a passing evaluation; kept as an explicit error
        // path rather than a panic.
        let staff_id = staff_id.ok_or(AppError::Rule(RuleViolation::StaffNotFound))?;

        let receipt = movements::append_receipt(
            txn.conn(),
            input.material_id,
            staff_id,
            input.weight,
            input.volume,
            today,
        )
        .await?;
        inventory::apply_delta(txn.conn(), input.material_id, input.weight, input.volume).await?;
        txn.commit().await?;

        tracing::debug!(
            receipt_id = %receipt.id,
            material_id = %receipt.material_id,
            weight_kg = %receipt.weight_kg,
            "receipt recorded"
        );
        Ok(receipt)
    }

    /// List all receipts, newest first.
    pub async fn list(&self) -> AppResult<Vec<Receipt>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, material_id, staff_id, weight_kg, volume_m3, movement_date, created_at
            FROM receipts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Receipt::from).collect())
    }

    /// Get a single receipt.
    pub async fn get(&self, receipt_id: Uuid) -> AppResult<Receipt> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, material_id, staff_id, weight_kg, volume_m3, movement_date, created_at
            FROM receipts
            WHERE id = $1
            "#,
        )
        .bind(receipt_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Receipt".to_string()))?;

        Ok(row.into())
    }
}
