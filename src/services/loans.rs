//! Loan listing service (read paths)

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{item::Availability, loan::LoanView},
    repository::Repository,
    services::overdue,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copy counts for an item
    pub async fn availability(&self, item_id: i32) -> AppResult<Availability> {
        self.repository.inventory.get_availability(item_id).await
    }

    /// Loans held by a member, enriched with their due status.
    ///
    /// Active loans come first (oldest first); with `include_history` the
    /// member's returned loans follow, newest first.
    pub async fn list_for_member(
        &self,
        member_id: i32,
        include_history: bool,
    ) -> AppResult<Vec<LoanView>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;

        let mut records = self.repository.loans.list_active_by_member(member_id).await?;
        if include_history {
            records.extend(
                self.repository
                    .loans
                    .list_history_by_member(member_id, None)
                    .await?,
            );
        }

        let now = Utc::now();
        Ok(records
            .into_iter()
            .map(|record| {
                let due_status = overdue::evaluate(&record, now);
                LoanView::new(record, due_status)
            })
            .collect())
    }
}
