//! Movement and collection order models
//!
//! Receipts and shipments are the two halves of the stock movement log;
//! collection orders share its per-day uniqueness discipline but never touch
//! inventory.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inbound movement: material brought in by a staff member.
///
/// Immutable once created; the ledger has no update or delete path for
/// receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub material_id: Uuid,
    pub staff_id: Uuid,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    /// Local calendar date at creation; all day/month windows run over this.
    pub movement_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a shipment record.
///
/// Retraction is the only amendment the log supports. Every aggregate over
/// shipments filters on this variant, so a retracted shipment is invisible
/// to stock sums and to the one-per-partner-per-day rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Active,
    Retracted,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Active => "active",
            ShipmentStatus::Retracted => "retracted",
        }
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ShipmentStatus::Active),
            "retracted" => Ok(ShipmentStatus::Retracted),
            other => Err(format!("unknown shipment status: {}", other)),
        }
    }
}

/// An outbound movement: material sent to a partner processing company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub material_id: Uuid,
    pub partner_id: Uuid,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub status: ShipmentStatus,
    pub movement_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub retracted_at: Option<DateTime<Utc>>,
}

/// A logged client service request. Recorded for the daily uniqueness rule;
/// does not affect inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionOrder {
    pub id: Uuid,
    pub material_id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Uuid,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub order_type: String,
    pub order_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
