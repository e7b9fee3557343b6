//! Inventory ledger: copy counts per item.
//!
//! Sole writer of `available_copies`. Reserve and release are single
//! conditional UPDATE statements so two borrowers racing for the last copy
//! serialize on the item row instead of racing a read-then-write window.

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::Availability,
};

/// Outcome of releasing a copy back into the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    /// `available_copies` already equals `total_copies`; the increment was
    /// refused. Seeing this while closing an active loan means the counts
    /// were corrupted elsewhere and the caller must report it.
    AlreadyAtCapacity,
}

#[derive(Clone)]
pub struct InventoryLedger {
    pool: Pool<Postgres>,
}

impl InventoryLedger {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy counts for an item
    pub async fn get_availability(&self, item_id: i32) -> AppResult<Availability> {
        sqlx::query_as::<_, Availability>(
            "SELECT total_copies AS total, available_copies AS available FROM items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))
    }

    /// Atomically take one copy, failing if none are available.
    ///
    /// Runs inside the caller's transaction; the conditional UPDATE is the
    /// serialization point, there is no separate availability read.
    pub async fn try_reserve_copy(&self, conn: &mut PgConnection, item_id: i32) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE items
            SET available_copies = available_copies - 1, updated_at = NOW()
            WHERE id = $1 AND available_copies > 0
            "#,
        )
        .bind(item_id)
        .execute(&mut *conn)
        .await?;

        if updated.rows_affected() == 1 {
            return Ok(());
        }

        // Zero rows: either the item is out of copies or it does not exist.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
            .bind(item_id)
            .fetch_one(&mut *conn)
            .await?;

        if exists {
            Err(AppError::NoCopiesAvailable(format!(
                "No copies of item {} are available",
                item_id
            )))
        } else {
            Err(AppError::NotFound(format!("Item with id {} not found", item_id)))
        }
    }

    /// Atomically put one copy back, never exceeding `total_copies`.
    pub async fn release_copy(
        &self,
        conn: &mut PgConnection,
        item_id: i32,
    ) -> AppResult<ReleaseOutcome> {
        let updated = sqlx::query(
            r#"
            UPDATE items
            SET available_copies = available_copies + 1, updated_at = NOW()
            WHERE id = $1 AND available_copies < total_copies
            "#,
        )
        .bind(item_id)
        .execute(&mut *conn)
        .await?;

        if updated.rows_affected() == 1 {
            return Ok(ReleaseOutcome::Released);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
            .bind(item_id)
            .fetch_one(&mut *conn)
            .await?;

        if exists {
            Ok(ReleaseOutcome::AlreadyAtCapacity)
        } else {
            Err(AppError::NotFound(format!("Item with id {} not found", item_id)))
        }
    }
}
