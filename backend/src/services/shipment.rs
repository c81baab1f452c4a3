//! Shipment service: outbound movements and their retraction
//!
//! Shipments run the same evaluate-then-commit pipeline as receipts, with
//! the partner's daily-uniqueness window locked alongside the material.
//! Retraction is the ledger's single amendment: it delists the shipment and
//! returns its quantities to inventory under the same locks.

use std::time::Duration;

use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Shipment;
use shared::validation::{self, RuleViolation, ShipmentContext, ShipmentRequest};

use crate::error::{AppError, AppResult};
use crate::ledger::locks::{self, LockRegistry};
use crate::ledger::movements::ShipmentRow;
use crate::ledger::{inventory, movements, LedgerTxn};
use crate::services::master_data::find_partner_id_by_cnpj;

/// Input for recording a shipment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentInput {
    pub material_id: Uuid,
    pub partner_cnpj: String,
    pub weight_sent: Decimal,
    pub volume_sent: Decimal,
}

/// Confirmation returned after a retraction: the delisted shipment plus the
/// inventory values it restored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRetraction {
    pub shipment: Shipment,
    pub new_weight_kg: Decimal,
    pub new_volume_m3: Decimal,
}

/// Shipment service
#[derive(Clone)]
pub struct ShipmentService {
    db: PgPool,
    locks: LockRegistry,
    lock_timeout: Duration,
}

impl ShipmentService {
    pub fn new(db: PgPool, locks: LockRegistry, lock_timeout: Duration) -> Self {
        Self {
            db,
            locks,
            lock_timeout,
        }
    }

    /// Record a shipment and decrement the material's inventory.
    pub async fn create(&self, input: CreateShipmentInput) -> AppResult<Shipment> {
        let today = Local::now().date_naive();

        let keys = [
            locks::material_key(input.material_id),
            locks::shipment_partner_key(&input.partner_cnpj),
        ];
        let mut txn = LedgerTxn::begin(&self.db, &self.locks, &keys, self.lock_timeout).await?;

        let material = inventory::find_snapshot(txn.conn(), input.material_id).await?;
        let partner_id = find_partner_id_by_cnpj(txn.conn(), &input.partner_cnpj).await?;

        let partner_has_shipment_today = match partner_id {
            Some(partner_id) => {
                movements::partner_has_shipment_on(txn.conn(), partner_id, today).await?
            }
            None => false,
        };

        let request = ShipmentRequest {
            weight_kg: input.weight_sent,
            volume_m3: input.volume_sent,
        };
        let ctx = ShipmentContext {
            material,
            partner_exists: partner_id.is_some(),
            partner_has_shipment_today,
        };
        validation::evaluate_shipment(&request, &ctx)?;

        let partner_id = partner_id.ok_or(AppError::Rule(RuleViolation::PartnerNotFound))?;

        let shipment = movements::append_shipment(
            txn.conn(),
            input.material_id,
            partner_id,
            input.weight_sent,
            input.volume_sent,
            today,
        )
        .await?;
        inventory::apply_delta(
            txn.conn(),
            input.material_id,
            -input.weight_sent,
            -input.volume_sent,
        )
        .await?;
        txn.commit().await?;

        tracing::debug!(
            shipment_id = %shipment.id,
            material_id = %shipment.material_id,
            weight_kg = %shipment.weight_kg,
            "shipment recorded"
        );
        Ok(shipment)
    }

    /// Retract a shipment, returning its quantities to inventory.
    pub async fn retract(&self, shipment_id: Uuid) -> AppResult<ShipmentRetraction> {
        // The lock keys depend on the record, so read its references first
        // and re-check the record itself once the locks are held.
        let heads = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT s.material_id, p.cnpj
            FROM shipments s
            JOIN partners p ON p.id = s.partner_id
            WHERE s.id = $1
            "#,
        )
        .bind(shipment_id)
        .fetch_optional(&self.db)
        .await?;

        let Some((material_id, partner_cnpj)) = heads else {
            return Err(AppError::Rule(RuleViolation::MovementNotFound));
        };

        let keys = [
            locks::material_key(material_id),
            locks::shipment_partner_key(&partner_cnpj),
        ];
        let mut txn = LedgerTxn::begin(&self.db, &self.locks, &keys, self.lock_timeout).await?;

        let material = inventory::find_snapshot(txn.conn(), material_id)
            .await?
            .ok_or(AppError::Rule(RuleViolation::MaterialNotFound))?;

        let retracted = movements::retract_shipment(txn.conn(), shipment_id).await?;
        let accepted =
            validation::evaluate_retraction(retracted.as_ref().map(|(_, snap)| snap), &material)?;

        let (shipment, snapshot) =
            retracted.ok_or(AppError::Rule(RuleViolation::MovementNotFound))?;

        inventory::apply_delta(
            txn.conn(),
            material_id,
            snapshot.weight_kg,
            snapshot.volume_m3,
        )
        .await?;
        txn.commit().await?;

        tracing::debug!(
            shipment_id = %shipment.id,
            material_id = %material_id,
            "shipment retracted"
        );
        Ok(ShipmentRetraction {
            shipment,
            new_weight_kg: accepted.new_weight_kg,
            new_volume_m3: accepted.new_volume_m3,
        })
    }

    /// List all shipments, newest first, retracted ones included.
    pub async fn list(&self) -> AppResult<Vec<Shipment>> {
        let rows = sqlx::query_as::<_, ShipmentRow>(
            r#"
            SELECT id, material_id, partner_id, weight_kg, volume_m3, status,
                   movement_date, created_at, retracted_at
            FROM shipments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ShipmentRow::into_shipment).collect()
    }

    /// Get a single shipment.
    pub async fn get(&self, shipment_id: Uuid) -> AppResult<Shipment> {
        let row = sqlx::query_as::<_, ShipmentRow>(
            r#"
            SELECT id, material_id, partner_id, weight_kg, volume_m3, status,
                   movement_date, created_at, retracted_at
            FROM shipments
            WHERE id = $1
            "#,
        )
        .bind(shipment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Shipment".to_string()))?;

        row.into_shipment()
    }
}
