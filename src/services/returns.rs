//! Return coordinator.
//!
//! Closes a loan and releases its copy back to the ledger in one
//! transaction. Repeated returns of the same loan are a no-op success: the
//! close's status guard fires, the ledger is not touched again.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::loan::LoanRecord,
    repository::{inventory::ReleaseOutcome, Repository},
};

/// Result of a return request
#[derive(Debug, Clone)]
pub enum ReturnOutcome {
    Returned(LoanRecord),
    /// The loan was already closed by an earlier request; nothing changed
    AlreadyReturned(LoanRecord),
}

#[derive(Clone)]
pub struct ReturnsService {
    repository: Repository,
}

impl ReturnsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Return a borrowed item by loan id
    pub async fn return_item(&self, loan_id: i32) -> AppResult<ReturnOutcome> {
        let now = Utc::now();

        let mut tx = self.repository.pool.begin().await?;

        match self.repository.loans.close_loan(&mut tx, loan_id, now).await {
            Ok(loan) => {
                let release = self
                    .repository
                    .inventory
                    .release_copy(&mut tx, loan.item_id)
                    .await?;

                tx.commit().await.map_err(AppError::from_circulation_db)?;

                if release == ReleaseOutcome::AlreadyAtCapacity {
                    // The ledger was already full while this loan was active:
                    // the counts were corrupted somewhere else. The clamp held,
                    // but this must not pass unnoticed.
                    tracing::error!(
                        loan_id = loan.id,
                        item_id = loan.item_id,
                        "available_copies already at total_copies while closing an active loan"
                    );
                } else {
                    tracing::info!(
                        loan_id = loan.id,
                        member_id = loan.member_id,
                        item_id = loan.item_id,
                        "item returned"
                    );
                }

                Ok(ReturnOutcome::Returned(loan))
            }
            Err(AppError::AlreadyReturned(_)) => {
                tx.rollback().await?;
                let loan = self.repository.loans.get_by_id(loan_id).await?;
                tracing::debug!(loan_id, "repeated return request, no-op");
                Ok(ReturnOutcome::AlreadyReturned(loan))
            }
            Err(err) => Err(err),
        }
    }
}
