//! Collection order service
//!
//! Orders share the movement log's per-day uniqueness discipline but never
//! touch inventory, so their pipeline locks only the (client, staff) pair
//! window.

use std::time::Duration;

use chrono::Local;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::CollectionOrder;
use shared::validation::{self, OrderContext, OrderRequest, RuleViolation};

use crate::error::{AppError, AppResult};
use crate::ledger::locks::{self, LockRegistry};
use crate::ledger::movements::OrderRow;
use crate::ledger::{movements, LedgerTxn};
use crate::services::master_data::{find_client_id_by_cpf, find_staff_id_by_cpf};

/// Input for recording a collection order
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub material_id: Uuid,
    pub client_cpf: String,
    pub staff_cpf: String,
    pub weight: Decimal,
    pub volume: Decimal,
    #[serde(rename = "type")]
    pub order_type: String,
}

/// Collection order service
#[derive(Clone)]
pub struct CollectionOrderService {
    db: PgPool,
    locks: LockRegistry,
    lock_timeout: Duration,
}

impl CollectionOrderService {
    pub fn new(db: PgPool, locks: LockRegistry, lock_timeout: Duration) -> Self {
        Self {
            db,
            locks,
            lock_timeout,
        }
    }

    /// Record a collection order. Inventory is untouched.
    pub async fn create(&self, input: CreateOrderInput) -> AppResult<CollectionOrder> {
        let today = Local::now().date_naive();

        let keys = [locks::order_pair_key(&input.client_cpf, &input.staff_cpf)];
        let mut txn = LedgerTxn::begin(&self.db, &self.locks, &keys, self.lock_timeout).await?;

        let client_id = find_client_id_by_cpf(txn.conn(), &input.client_cpf).await?;
        let staff_id = find_staff_id_by_cpf(txn.conn(), &input.staff_cpf).await?;
        let material_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM materials WHERE id = $1)")
                .bind(input.material_id)
                .fetch_one(txn.conn())
                .await?;

        let order_exists_today = match (client_id, staff_id) {
            (Some(client_id), Some(staff_id)) => {
                movements::order_exists_on(txn.conn(), client_id, staff_id, today).await?
            }
            _ => false,
        };

        let request = OrderRequest {
            weight_kg: input.weight,
            volume_m3: input.volume,
        };
        let ctx = OrderContext {
            client_exists: client_id.is_some(),
            staff_exists: staff_id.is_some(),
            material_exists,
            order_exists_today,
        };
        validation::evaluate_collection_order(&request, &ctx)?;

        let client_id = client_id.ok_or(AppError::Rule(RuleViolation::ClientNotFound))?;
        let staff_id = staff_id.ok_or(AppError::Rule(RuleViolation::StaffNotFound))?;

        let order = movements::append_order(
            txn.conn(),
            input.material_id,
            client_id,
            staff_id,
            input.weight,
            input.volume,
            &input.order_type,
            today,
        )
        .await?;
        txn.commit().await?;

        tracing::debug!(
            order_id = %order.id,
            client_id = %order.client_id,
            staff_id = %order.staff_id,
            "collection order recorded"
        );
        Ok(order)
    }

    /// List all collection orders, newest first.
    pub async fn list(&self) -> AppResult<Vec<CollectionOrder>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, material_id, client_id, staff_id, weight_kg, volume_m3,
                   order_type, order_date, created_at
            FROM collection_orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CollectionOrder::from).collect())
    }

    /// Get a single collection order.
    pub async fn get(&self, order_id: Uuid) -> AppResult<CollectionOrder> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, material_id, client_id, staff_id, weight_kg, volume_m3,
                   order_type, order_date, created_at
            FROM collection_orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Collection order".to_string()))?;

        Ok(row.into())
    }
}
