//! Material service: inventory rows and their reconciliation
//!
//! Creation and deletion are plain record management; stock starts at zero
//! and only movements change it. The reconciliation read recomputes the log
//! sums and compares them to the materialized row, surfacing divergence
//! instead of hiding it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Material;
use shared::types::RiskLevel;

use crate::error::{AppError, AppResult};
use crate::ledger::inventory::MaterialRow;

/// Input for registering a material
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialInput {
    pub name: String,
    pub risk_level: RiskLevel,
}

/// Fleet-wide inventory summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub material_count: i64,
    pub total_weight_kg: Decimal,
    pub total_volume_m3: Decimal,
    /// Materials currently below the 100 kg shipment floor.
    pub below_shipment_floor: i64,
}

/// Reconciliation of a material row against its movement log
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialReconciliation {
    pub material_id: Uuid,
    pub recorded_weight_kg: Decimal,
    pub recorded_volume_m3: Decimal,
    pub computed_weight_kg: Decimal,
    pub computed_volume_m3: Decimal,
    pub consistent: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct ReconciliationRow {
    weight_kg: Decimal,
    volume_m3: Decimal,
    receipt_weight: Decimal,
    receipt_volume: Decimal,
    shipped_weight: Decimal,
    shipped_volume: Decimal,
}

/// Material service
#[derive(Clone)]
pub struct MaterialService {
    db: PgPool,
}

impl MaterialService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a material. Stock starts at zero; only movements change it.
    pub async fn create(&self, input: CreateMaterialInput) -> AppResult<Material> {
        let taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM materials WHERE name = $1)")
                .bind(&input.name)
                .fetch_one(&self.db)
                .await?;
        if taken {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let row = sqlx::query_as::<_, MaterialRow>(
            r#"
            INSERT INTO materials (name, risk_level)
            VALUES ($1, $2)
            RETURNING id, name, weight_kg, volume_m3, risk_level, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.risk_level.as_str())
        .fetch_one(&self.db)
        .await?;

        row.into_material()
    }

    /// List all materials.
    pub async fn list(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, name, weight_kg, volume_m3, risk_level, created_at, updated_at
            FROM materials
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(MaterialRow::into_material).collect()
    }

    /// Get a single material.
    pub async fn get(&self, material_id: Uuid) -> AppResult<Material> {
        let row = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, name, weight_kg, volume_m3, risk_level, created_at, updated_at
            FROM materials
            WHERE id = $1
            "#,
        )
        .bind(material_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Material".to_string()))?;

        row.into_material()
    }

    /// Delete a material. Refused while any movement or order references it.
    pub async fn delete(&self, material_id: Uuid) -> AppResult<()> {
        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM receipts WHERE material_id = $1)
                OR EXISTS(SELECT 1 FROM shipments WHERE material_id = $1)
                OR EXISTS(SELECT 1 FROM collection_orders WHERE material_id = $1)
            "#,
        )
        .bind(material_id)
        .fetch_one(&self.db)
        .await?;
        if referenced {
            return Err(AppError::Conflict {
                resource: "material".to_string(),
                message: "Material has movement history and cannot be deleted".to_string(),
                message_pt: "O material possui histórico de movimentações e não pode ser excluído"
                    .to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(material_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Material".to_string()));
        }

        Ok(())
    }

    /// Fleet-wide inventory summary.
    pub async fn summary(&self) -> AppResult<InventorySummary> {
        let row = sqlx::query_as::<_, (i64, Decimal, Decimal, i64)>(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(weight_kg), 0),
                   COALESCE(SUM(volume_m3), 0),
                   COUNT(*) FILTER (WHERE weight_kg < 100)
            FROM materials
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(InventorySummary {
            material_count: row.0,
            total_weight_kg: row.1,
            total_volume_m3: row.2,
            below_shipment_floor: row.3,
        })
    }

    /// Recompute a material's stock from the movement log and compare it to
    /// the materialized row.
    pub async fn reconcile(&self, material_id: Uuid) -> AppResult<MaterialReconciliation> {
        let row = sqlx::query_as::<_, ReconciliationRow>(
            r#"
            SELECT m.weight_kg, m.volume_m3,
                   COALESCE((SELECT SUM(weight_kg) FROM receipts WHERE material_id = m.id), 0)
                       AS receipt_weight,
                   COALESCE((SELECT SUM(volume_m3) FROM receipts WHERE material_id = m.id), 0)
                       AS receipt_volume,
                   COALESCE((SELECT SUM(weight_kg) FROM shipments
                             WHERE material_id = m.id AND status = 'active'), 0)
                       AS shipped_weight,
                   COALESCE((SELECT SUM(volume_m3) FROM shipments
                             WHERE material_id = m.id AND status = 'active'), 0)
                       AS shipped_volume
            FROM materials m
            WHERE m.id = $1
            "#,
        )
        .bind(material_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Material".to_string()))?;

        let computed_weight_kg = row.receipt_weight - row.shipped_weight;
        let computed_volume_m3 = row.receipt_volume - row.shipped_volume;
        let consistent =
            row.weight_kg == computed_weight_kg && row.volume_m3 == computed_volume_m3;

        if !consistent {
            tracing::error!(
                %material_id,
                recorded_weight = %row.weight_kg,
                computed_weight = %computed_weight_kg,
                "material row diverged from its movement log"
            );
        }

        Ok(MaterialReconciliation {
            material_id,
            recorded_weight_kg: row.weight_kg,
            recorded_volume_m3: row.volume_m3,
            computed_weight_kg,
            computed_volume_m3,
            consistent,
        })
    }
}
