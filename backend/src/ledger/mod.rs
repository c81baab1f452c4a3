//! Transaction coordinator for the stock ledger
//!
//! Every mutating ledger operation follows the same shape: acquire the
//! operation's lock keys, open a database transaction, load the inventory
//! snapshot and log aggregates, ask the validation engine for a decision,
//! append to the log and apply the inventory delta, commit. `LedgerTxn`
//! owns the lock-then-transact half of that pipeline so the discipline is
//! identical across the receipt, shipment and collection order paths.

pub mod inventory;
pub mod locks;
pub mod movements;

use std::time::Duration;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::OwnedMutexGuard;

use crate::error::AppError;
use locks::LockRegistry;

/// An open ledger transaction: the operation's lock keys plus a database
/// transaction, held together until commit.
///
/// Dropping the value rolls the transaction back and then releases the
/// locks, so on any failure no log entry and no inventory change become
/// visible.
pub struct LedgerTxn {
    // Field order matters: the transaction must roll back before the lock
    // guards release.
    tx: Transaction<'static, Postgres>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl LedgerTxn {
    /// Acquire `keys` (bounded by `timeout`) and open a transaction.
    ///
    /// The locks are held from before any aggregate is read until after the
    /// commit, which is what keeps two racing movements from both observing
    /// the same pre-mutation snapshot.
    pub async fn begin(
        pool: &PgPool,
        locks: &LockRegistry,
        keys: &[String],
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let guards = locks.acquire_many(keys, timeout).await?;
        let tx = pool.begin().await?;
        Ok(Self {
            tx,
            _guards: guards,
        })
    }

    /// The transaction's connection, for ledger reads and writes.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
