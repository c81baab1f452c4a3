//! Movement and order log
//!
//! Append-only records of receipts, shipments and collection orders, plus
//! the window aggregates the validation engine depends on. The single
//! amendment the log supports is shipment retraction, which flips the status
//! variant instead of deleting the row so the history stays complete.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use shared::models::{CollectionOrder, Receipt, Shipment, ShipmentStatus};
use shared::validation::ShipmentSnapshot;

use crate::error::AppError;

#[derive(Debug, FromRow)]
pub(crate) struct ReceiptRow {
    pub id: Uuid,
    pub material_id: Uuid,
    pub staff_id: Uuid,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub movement_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<ReceiptRow> for Receipt {
    fn from(row: ReceiptRow) -> Self {
        Receipt {
            id: row.id,
            material_id: row.material_id,
            staff_id: row.staff_id,
            weight_kg: row.weight_kg,
            volume_m3: row.volume_m3,
            movement_date: row.movement_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ShipmentRow {
    pub id: Uuid,
    pub material_id: Uuid,
    pub partner_id: Uuid,
    pub weight_kg: Decimal,
    pub volume_m3: Decimal,
    pub status: String,
    pub movement_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub retracted_at: Option<DateTime<Utc>>,
}

impl ShipmentRow {
    pub(crate) fn into_shipment(self) -> Result<Shipment, AppError> {
        let status = self
            .status
            .parse::<ShipmentStatus>()
            .map_err(AppError::Internal)?;
        Ok(Shipment {
            id: self.id,
            material_id: self.material_id,
            partner_id: self.partner_id,
            weight_kg: self.weight_kg,
            volume_m3: self.volume_m3,
            status,
            movement_date: self.movement_date,
            created_at: self.created_at,
            retracted_at: self.retracted_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
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

impl From<OrderRow> for CollectionOrder {
    fn from(row: OrderRow) -> Self {
        CollectionOrder {
            id: row.id,
            material_id: row.material_id,
            client_id: row.client_id,
            staff_id: row.staff_id,
            weight_kg: row.weight_kg,
            volume_m3: row.volume_m3,
            order_type: row.order_type,
            order_date: row.order_date,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Appends
// ============================================================================

pub async fn append_receipt(
    conn: &mut PgConnection,
    material_id: Uuid,
    staff_id: Uuid,
    weight_kg: Decimal,
    volume_m3: Decimal,
    movement_date: NaiveDate,
) -> Result<Receipt, AppError> {
    let row = sqlx::query_as::<_, ReceiptRow>(
        r#"
        INSERT INTO receipts (material_id, staff_id, weight_kg, volume_m3, movement_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, material_id, staff_id, weight_kg, volume_m3, movement_date, created_at
        "#,
    )
    .bind(material_id)
    .bind(staff_id)
    .bind(weight_kg)
    .bind(volume_m3)
    .bind(movement_date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
}

pub async fn append_shipment(
    conn: &mut PgConnection,
    material_id: Uuid,
    partner_id: Uuid,
    weight_kg: Decimal,
    volume_m3: Decimal,
    movement_date: NaiveDate,
) -> Result<Shipment, AppError> {
    let row = sqlx::query_as::<_, ShipmentRow>(
        r#"
        INSERT INTO shipments (material_id, partner_id, weight_kg, volume_m3, movement_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, material_id, partner_id, weight_kg, volume_m3, status,
                  movement_date, created_at, retracted_at
        "#,
    )
    .bind(material_id)
    .bind(partner_id)
    .bind(weight_kg)
    .bind(volume_m3)
    .bind(movement_date)
    .fetch_one(&mut *conn)
    .await?;

    row.into_shipment()
}

/// Mark an active shipment retracted and return it together with the
/// quantities to reverse. Returns `None` when no active shipment with this
/// id exists (unknown id, or already retracted).
pub async fn retract_shipment(
    conn: &mut PgConnection,
    shipment_id: Uuid,
) -> Result<Option<(Shipment, ShipmentSnapshot)>, AppError> {
    let row = sqlx::query_as::<_, ShipmentRow>(
        r#"
        UPDATE shipments
        SET status = 'retracted', retracted_at = NOW()
        WHERE id = $1 AND status = 'active'
        RETURNING id, material_id, partner_id, weight_kg, volume_m3, status,
                  movement_date, created_at, retracted_at
        "#,
    )
    .bind(shipment_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let shipment = row.into_shipment()?;
            let snapshot = ShipmentSnapshot {
                weight_kg: shipment.weight_kg,
                volume_m3: shipment.volume_m3,
            };
            Ok(Some((shipment, snapshot)))
        }
        None => Ok(None),
    }
}

pub async fn append_order(
    conn: &mut PgConnection,
    material_id: Uuid,
    client_id: Uuid,
    staff_id: Uuid,
    weight_kg: Decimal,
    volume_m3: Decimal,
    order_type: &str,
    order_date: NaiveDate,
) -> Result<CollectionOrder, AppError> {
    let row = sqlx::query_as::<_, OrderRow>(
        r#"
        INSERT INTO collection_orders
            (material_id, client_id, staff_id, weight_kg, volume_m3, order_type, order_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, material_id, client_id, staff_id, weight_kg, volume_m3,
                  order_type, order_date, created_at
        "#,
    )
    .bind(material_id)
    .bind(client_id)
    .bind(staff_id)
    .bind(weight_kg)
    .bind(volume_m3)
    .bind(order_type)
    .bind(order_date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
}

// ============================================================================
// Window aggregates
// ============================================================================

/// Receipt weight already logged for a staff member in `date`'s calendar
/// month.
pub async fn staff_month_receipt_total(
    conn: &mut PgConnection,
    staff_id: Uuid,
    date: NaiveDate,
) -> Result<Decimal, AppError> {
    let total = sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT COALESCE(SUM(weight_kg), 0)
        FROM receipts
        WHERE staff_id = $1
          AND date_trunc('month', movement_date) = date_trunc('month', $2::date)
        "#,
    )
    .bind(staff_id)
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

/// Receipt weight already logged across all staff on `date`.
pub async fn day_receipt_total(
    conn: &mut PgConnection,
    date: NaiveDate,
) -> Result<Decimal, AppError> {
    let total = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(weight_kg), 0) FROM receipts WHERE movement_date = $1",
    )
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

/// Whether an active shipment for this partner already exists on `date`.
pub async fn partner_has_shipment_on(
    conn: &mut PgConnection,
    partner_id: Uuid,
    date: NaiveDate,
) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM shipments
            WHERE partner_id = $1 AND movement_date = $2 AND status = 'active'
        )
        "#,
    )
    .bind(partner_id)
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

/// Whether an order for this (client, staff) pair already exists on `date`.
pub async fn order_exists_on(
    conn: &mut PgConnection,
    client_id: Uuid,
    staff_id: Uuid,
    date: NaiveDate,
) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM collection_orders
            WHERE client_id = $1 AND staff_id = $2 AND order_date = $3
        )
        "#,
    )
    .bind(client_id)
    .bind(staff_id)
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}
