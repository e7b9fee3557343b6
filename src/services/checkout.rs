//! Checkout coordinator.
//!
//! Single entry point for borrow requests. Every precondition and both
//! writes (ledger decrement, loan insert) run inside one transaction, so a
//! failure after the reservation rolls the reservation back with it.

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::CheckoutRequest,
    repository::Repository,
};

/// Due-date policy window: strictly in the future, at most `max_term_days` ahead.
pub fn validate_due_date(
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
    max_term_days: i64,
) -> AppResult<()> {
    if due_date <= now {
        return Err(AppError::InvalidDueDate(
            "Due date must be in the future".to_string(),
        ));
    }
    if due_date > now + Duration::days(max_term_days) {
        return Err(AppError::InvalidDueDate(format!(
            "Due date must be within {} days",
            max_term_days
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CheckoutService {
    repository: Repository,
    policy: LoansConfig,
}

impl CheckoutService {
    pub fn new(repository: Repository, policy: LoansConfig) -> Self {
        Self { repository, policy }
    }

    /// Borrow an item: returns the new loan id and its due date.
    ///
    /// Only this coordinator calls `try_reserve_copy`.
    pub async fn checkout(&self, request: CheckoutRequest) -> AppResult<(i32, DateTime<Utc>)> {
        let now = Utc::now();
        let due_date = request
            .due_date
            .unwrap_or_else(|| now + Duration::days(self.policy.default_term_days));
        validate_due_date(due_date, now, self.policy.max_term_days)?;

        let mut tx = self.repository.pool.begin().await?;

        if !self
            .repository
            .members
            .exists(&mut tx, request.member_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                request.member_id
            )));
        }

        if self
            .repository
            .loans
            .has_active_loan(&mut tx, request.member_id, request.item_id)
            .await?
        {
            return Err(AppError::AlreadyBorrowed(format!(
                "Member {} already holds item {}",
                request.member_id, request.item_id
            )));
        }

        // Serialization point: conditional decrement on the item row. Reports
        // NotFound for a missing item, NoCopiesAvailable when out of copies.
        self.repository
            .inventory
            .try_reserve_copy(&mut tx, request.item_id)
            .await?;

        let loan = self
            .repository
            .loans
            .create_active_loan(&mut tx, request.member_id, request.item_id, now, due_date)
            .await?;

        tx.commit().await.map_err(AppError::from_circulation_db)?;

        tracing::info!(
            loan_id = loan.id,
            member_id = loan.member_id,
            item_id = loan.item_id,
            due_date = %loan.due_date,
            "item checked out"
        );

        Ok((loan.id, loan.due_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn due_date_three_weeks_ahead_is_accepted() {
        let now = now();
        assert!(validate_due_date(now + Duration::days(21), now, 90).is_ok());
    }

    #[test]
    fn due_date_at_the_window_edge_is_accepted() {
        let now = now();
        assert!(validate_due_date(now + Duration::days(90), now, 90).is_ok());
    }

    #[test]
    fn due_date_four_months_ahead_is_rejected() {
        let now = now();
        let result = validate_due_date(now + Duration::days(120), now, 90);
        assert!(matches!(result, Err(AppError::InvalidDueDate(_))));
    }

    #[test]
    fn due_date_in_the_past_is_rejected() {
        let now = now();
        let result = validate_due_date(now - Duration::days(1), now, 90);
        assert!(matches!(result, Err(AppError::InvalidDueDate(_))));
    }

    #[test]
    fn due_date_equal_to_now_is_rejected() {
        let now = now();
        let result = validate_due_date(now, now, 90);
        assert!(matches!(result, Err(AppError::InvalidDueDate(_))));
    }
}
