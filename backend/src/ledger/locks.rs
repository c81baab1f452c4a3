//! Per-key exclusive locks for the transaction coordinator
//!
//! Movements are serialized by string keys (one per material, plus one per
//! cap window they touch) instead of a process-wide lock, so operations on
//! unrelated materials proceed fully in parallel. Acquisition is bounded:
//! a request that cannot get its keys within the configured timeout aborts
//! with `LockTimeout` and leaves no partial effects.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::{timeout_at, Instant};
use uuid::Uuid;

use crate::error::AppError;

/// Registry size at which idle entries are swept.
const PRUNE_THRESHOLD: usize = 1_024;

/// String-keyed registry of async mutexes with bounded acquisition.
///
/// A key is exclusive; distinct keys are independent. Waiters on the same
/// key are not FIFO-ordered, but acquisition is linearizable per key: no two
/// holders ever overlap.
#[derive(Clone, Default)]
pub struct LockRegistry {
    inner: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().expect("lock registry poisoned");
        if map.len() > PRUNE_THRESHOLD {
            // An entry referenced only by the map has neither a holder nor a
            // waiter and can be dropped.
            map.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        }
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquire a single key, waiting at most `timeout`.
    pub async fn acquire(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<OwnedMutexGuard<()>, AppError> {
        self.acquire_until(key, Instant::now() + timeout).await
    }

    /// Acquire several keys under one shared deadline.
    ///
    /// Callers must list keys in the canonical order documented below;
    /// acquiring in a fixed global order is what makes deadlock impossible.
    pub async fn acquire_many(
        &self,
        keys: &[String],
        timeout: Duration,
    ) -> Result<Vec<OwnedMutexGuard<()>>, AppError> {
        let deadline = Instant::now() + timeout;
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire_until(key, deadline).await?);
        }
        Ok(guards)
    }

    async fn acquire_until(
        &self,
        key: &str,
        deadline: Instant,
    ) -> Result<OwnedMutexGuard<()>, AppError> {
        let mutex = self.entry(key);
        timeout_at(deadline, mutex.lock_owned())
            .await
            .map_err(|_| AppError::LockTimeout {
                key: key.to_string(),
            })
    }
}

// ============================================================================
// Canonical lock keys
// ============================================================================
//
// Acquisition order: material first, then the staff/partner/pair key, then
// the day key. Every pipeline uses the same order.

/// Serializes all inventory mutations of one material.
pub fn material_key(material_id: Uuid) -> String {
    format!("material:{}", material_id)
}

/// Serializes a staff member's monthly receipt-cap check across materials.
pub fn receipt_staff_key(staff_cpf: &str) -> String {
    format!("receipt-staff:{}", staff_cpf)
}

/// Serializes the organization-wide daily receipt-cap check.
pub fn receipt_day_key(date: NaiveDate) -> String {
    format!("receipt-day:{}", date)
}

/// Serializes a partner's one-shipment-per-day check.
pub fn shipment_partner_key(partner_cnpj: &str) -> String {
    format!("shipment-partner:{}", partner_cnpj)
}

/// Serializes a (client, staff) pair's one-order-per-day check.
pub fn order_pair_key(client_cpf: &str, staff_cpf: &str) -> String {
    format!("order:{}:{}", client_cpf, staff_cpf)
}
