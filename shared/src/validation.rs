//! Stock movement validation engine for the Recicla Operations Platform
//!
//! Pure decision logic: given a proposed movement and a snapshot of the state
//! it would act on, decide accept/reject and compute the new inventory
//! values. Rules are evaluated in a fixed order and the first failing rule
//! wins, so error precedence is deterministic.
//!
//! Nothing here performs IO. The transaction coordinator in the backend is
//! responsible for loading the snapshot and aggregates while it holds the
//! material's exclusive lock, and for applying the accepted values inside the
//! same transaction.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::types::StockResource;

// ============================================================================
// Business thresholds
// ============================================================================

/// Maximum receipt weight a single staff member may bring in per calendar
/// month, in kilograms.
pub const STAFF_MONTHLY_RECEIPT_CAP_KG: i64 = 100;

/// Maximum receipt weight the whole operation may take in per calendar day.
pub const DAILY_RECEIPT_CAP_KG: i64 = 2_000;

/// Minimum weight a material must have on hand before any shipment against
/// it is permitted. The floor reads live stock at decision time, so once
/// stock dips below it shipments stay blocked until receipts restore it.
pub const SHIPMENT_BASE_STOCK_FLOOR_KG: i64 = 100;

// ============================================================================
// Snapshots and requests
// ============================================================================

/// Inventory snapshot of the material a movement acts on, read under lock.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSnapshot {
    pub id: Uuid,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
}

/// Quantities of a previously accepted shipment, as recorded in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentSnapshot {
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
}

/// Proposed receipt quantities.
#[derive(Debug, Clone)]
pub struct ReceiptRequest {
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
}

/// Aggregate state a receipt decision depends on.
#[derive(Debug, Clone)]
pub struct ReceiptContext {
    pub material: Option<MaterialSnapshot>,
    pub staff_exists: bool,
    /// Receipt weight already accepted for this staff member in the current
    /// calendar month, excluding the proposed receipt.
    pub staff_month_total_kg: Decimal,
    /// Receipt weight already accepted across all staff today.
    pub day_total_kg: Decimal,
}

/// Proposed shipment quantities.
#[derive(Debug, Clone)]
pub struct ShipmentRequest {
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
}

/// Aggregate state a shipment decision depends on.
#[derive(Debug, Clone)]
pub struct ShipmentContext {
    pub material: Option<MaterialSnapshot>,
    pub partner_exists: bool,
    /// Whether an active shipment for this partner already exists today.
    pub partner_has_shipment_today: bool,
}

/// Proposed collection order quantities.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
}

/// Aggregate state a collection order decision depends on.
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub client_exists: bool,
    pub staff_exists: bool,
    pub material_exists: bool,
    /// Whether an order for this (client, staff) pair already exists today.
    pub order_exists_today: bool,
}

/// An accepted movement: the values the material row moves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub new_weight_kg: Decimal,
    pub new_volume_m3: Decimal,
}

// ============================================================================
// Rule violations
// ============================================================================

/// A business rule rejected the proposed movement. No state was mutated.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleViolation {
    #[error("material not found")]
    MaterialNotFound,

    #[error("staff member not found")]
    StaffNotFound,

    #[error("client not found")]
    ClientNotFound,

    #[error("partner company not found")]
    PartnerNotFound,

    #[error("movement not found")]
    MovementNotFound,

    #[error("weight and volume must be positive")]
    InvalidQuantity,

    #[error("monthly receipt cap exceeded: {current_total} kg already received by this staff member this month (cap 100 kg)")]
    MonthlyCapExceeded { current_total: Decimal },

    #[error("daily receipt cap exceeded: {current_total} kg already received today (cap 2000 kg)")]
    DailyCapExceeded { current_total: Decimal },

    #[error("a shipment for this partner already exists today")]
    DuplicateDailyShipment,

    #[error("a collection order for this client and staff member already exists today")]
    DuplicateDailyOrder,

    #[error("stock below the 100 kg operating floor: {available} kg on hand")]
    InsufficientBaseStock { available: Decimal },

    #[error("insufficient {resource} available: {available}")]
    InsufficientStock {
        resource: StockResource,
        available: Decimal,
    },
}

// ============================================================================
// Decision functions
// ============================================================================

/// Decide an inbound receipt.
///
/// Rule order: material exists, staff exists, quantities positive, monthly
/// staff cap, daily operation cap.
pub fn evaluate_receipt(
    req: &ReceiptRequest,
    ctx: &ReceiptContext,
) -> Result<Accepted, RuleViolation> {
    let material = ctx.material.as_ref().ok_or(RuleViolation::MaterialNotFound)?;

    if !ctx.staff_exists {
        return Err(RuleViolation::StaffNotFound);
    }

    require_positive(req.weight_kg, req.volume_m3)?;

    if ctx.staff_month_total_kg + req.weight_kg > Decimal::from(STAFF_MONTHLY_RECEIPT_CAP_KG) {
        return Err(RuleViolation::MonthlyCapExceeded {
            current_total: ctx.staff_month_total_kg,
        });
    }

    if ctx.day_total_kg + req.weight_kg > Decimal::from(DAILY_RECEIPT_CAP_KG) {
        return Err(RuleViolation::DailyCapExceeded {
            current_total: ctx.day_total_kg,
        });
    }

    Ok(Accepted {
        new_weight_kg: material.weight_kg + req.weight_kg,
        new_volume_m3: material.volume_m3 + req.volume_m3,
    })
}

/// Decide an outbound shipment.
///
/// Rule order: material exists, partner exists, no shipment for the partner
/// today, quantities positive, base-stock floor, sufficiency of weight then
/// volume. The duplicate check precedes the stock checks so that a partner
/// who already shipped today is told so even when stock has since fallen
/// below the floor.
pub fn evaluate_shipment(
    req: &ShipmentRequest,
    ctx: &ShipmentContext,
) -> Result<Accepted, RuleViolation> {
    let material = ctx.material.as_ref().ok_or(RuleViolation::MaterialNotFound)?;

    if !ctx.partner_exists {
        return Err(RuleViolation::PartnerNotFound);
    }

    if ctx.partner_has_shipment_today {
        return Err(RuleViolation::DuplicateDailyShipment);
    }

    require_positive(req.weight_kg, req.volume_m3)?;

    if material.weight_kg < Decimal::from(SHIPMENT_BASE_STOCK_FLOOR_KG) {
        return Err(RuleViolation::InsufficientBaseStock {
            available: material.weight_kg,
        });
    }

    if req.weight_kg > material.weight_kg {
        return Err(RuleViolation::InsufficientStock {
            resource: StockResource::Weight,
            available: material.weight_kg,
        });
    }
    if req.volume_m3 > material.volume_m3 {
        return Err(RuleViolation::InsufficientStock {
            resource: StockResource::Volume,
            available: material.volume_m3,
        });
    }

    Ok(Accepted {
        new_weight_kg: material.weight_kg - req.weight_kg,
        new_volume_m3: material.volume_m3 - req.volume_m3,
    })
}

/// Decide a shipment retraction.
///
/// Structurally always accepted once the active shipment exists; the effect
/// adds the original quantities back to the material.
pub fn evaluate_retraction(
    shipment: Option<&ShipmentSnapshot>,
    material: &MaterialSnapshot,
) -> Result<Accepted, RuleViolation> {
    let shipment = shipment.ok_or(RuleViolation::MovementNotFound)?;

    Ok(Accepted {
        new_weight_kg: material.weight_kg + shipment.weight_kg,
        new_volume_m3: material.volume_m3 + shipment.volume_m3,
    })
}

/// Decide a collection order.
///
/// Rule order: client exists, staff exists, material exists, no order for
/// the (client, staff) pair today, quantities positive. Accepted orders are
/// recorded only; inventory is untouched.
pub fn evaluate_collection_order(
    req: &OrderRequest,
    ctx: &OrderContext,
) -> Result<(), RuleViolation> {
    if !ctx.client_exists {
        return Err(RuleViolation::ClientNotFound);
    }
    if !ctx.staff_exists {
        return Err(RuleViolation::StaffNotFound);
    }
    if !ctx.material_exists {
        return Err(RuleViolation::MaterialNotFound);
    }
    if ctx.order_exists_today {
        return Err(RuleViolation::DuplicateDailyOrder);
    }

    require_positive(req.weight_kg, req.volume_m3)?;

    Ok(())
}

fn require_positive(weight_kg: Decimal, volume_m3: Decimal) -> Result<(), RuleViolation> {
    if weight_kg <= Decimal::ZERO || volume_m3 <= Decimal::ZERO {
        return Err(RuleViolation::InvalidQuantity);
    }
    Ok(())
}
