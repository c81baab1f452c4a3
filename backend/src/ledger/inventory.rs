//! Inventory store: the per-material stock row
//!
//! The row is a materialized aggregate of the movement log. Snapshot reads
//! run `FOR UPDATE` so the database row lock backs the registry lock held by
//! the coordinator; every write goes through the guarded delta below.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use shared::models::Material;
use shared::types::RiskLevel;
use shared::validation::MaterialSnapshot;

use crate::error::AppError;

/// Row shape shared by every `RETURNING`/`SELECT` over materials.
#[derive(Debug, FromRow)]
pub(crate) struct MaterialRow {
    pub id: Uuid,
    pub name: String,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub risk_level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaterialRow {
    pub(crate) fn into_material(self) -> Result<Material, AppError> {
        let risk_level = self
            .risk_level
            .parse::<RiskLevel>()
            .map_err(AppError::Internal)?;
        Ok(Material {
            id: self.id,
            name: self.name,
            weight_kg: self.weight_kg,
            volume_m3: self.volume_m3,
            risk_level,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Load the inventory snapshot of a material, taking its row lock.
pub async fn find_snapshot(
    conn: &mut PgConnection,
    material_id: Uuid,
) -> Result<Option<MaterialSnapshot>, AppError> {
    let row = sqlx::query_as::<_, (Uuid, Decimal, Decimal)>(
        "SELECT id, weight_kg, volume_m3 FROM materials WHERE id = $1 FOR UPDATE",
    )
    .bind(material_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(id, weight_kg, volume_m3)| MaterialSnapshot {
        id,
        weight_kg,
        volume_m3,
    }))
}

/// Apply a signed delta to a material's counters.
///
/// The WHERE clause re-checks non-negativity. When the validation engine is
/// correct the predicate always matches; a miss means the row and the
/// movement log have diverged, so the update is refused and the transaction
/// aborts with `StockInvariantViolation`.
pub async fn apply_delta(
    conn: &mut PgConnection,
    material_id: Uuid,
    delta_weight_kg: Decimal,
    delta_volume_m3: Decimal,
) -> Result<Material, AppError> {
    let row = sqlx::query_as::<_, MaterialRow>(
        r#"
        UPDATE materials
        SET weight_kg = weight_kg + $2, volume_m3 = volume_m3 + $3, updated_at = NOW()
        WHERE id = $1 AND weight_kg + $2 >= 0 AND volume_m3 + $3 >= 0
        RETURNING id, name, weight_kg, volume_m3, risk_level, created_at, updated_at
        "#,
    )
    .bind(material_id)
    .bind(delta_weight_kg)
    .bind(delta_volume_m3)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => row.into_material(),
        None => Err(AppError::StockInvariantViolation { material_id }),
    }
}
