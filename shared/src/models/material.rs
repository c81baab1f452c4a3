//! Material inventory models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::RiskLevel;

/// A tracked material type with its live inventory counters.
///
/// `weight_kg` and `volume_m3` are a materialized aggregate of the movement
/// log. They are mutated only by the transaction coordinator while it holds
/// the material's exclusive lock, and must never diverge from the sums of
/// the active movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    pub name: String,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
