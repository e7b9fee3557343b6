//! Loan registry: loan records and their lifecycle.
//!
//! Source of truth for "is this item currently on loan to this member". The
//! one-active-loan-per-(member, item) invariant is enforced twice: by the
//! `has_active_loan` precondition inside the checkout transaction, and by the
//! partial unique index on the loans table for concurrent inserts.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::LoanRecord,
};

#[derive(Clone)]
pub struct LoanRegistry {
    pool: Pool<Postgres>,
}

impl LoanRegistry {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<LoanRecord> {
        sqlx::query_as::<_, LoanRecord>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// True if the member currently holds the item
    pub async fn has_active_loan(
        &self,
        conn: &mut PgConnection,
        member_id: i32,
        item_id: i32,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM loans
                WHERE member_id = $1 AND item_id = $2 AND status = 'active'
            )
            "#,
        )
        .bind(member_id)
        .bind(item_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(exists)
    }

    /// Insert a new active loan.
    ///
    /// A concurrent checkout for the same pair loses on the partial unique
    /// index and surfaces as `AlreadyBorrowed`.
    pub async fn create_active_loan(
        &self,
        conn: &mut PgConnection,
        member_id: i32,
        item_id: i32,
        loan_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<LoanRecord> {
        sqlx::query_as::<_, LoanRecord>(
            r#"
            INSERT INTO loans (member_id, item_id, loan_date, due_date, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(item_id)
        .bind(loan_date)
        .bind(due_date)
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::from_circulation_db)
    }

    /// Close an active loan, stamping its return date.
    ///
    /// The status guard in the UPDATE makes repeated closes report
    /// `AlreadyReturned` instead of stamping twice, which is what keeps the
    /// return path from double-incrementing availability.
    pub async fn close_loan(
        &self,
        conn: &mut PgConnection,
        loan_id: i32,
        return_date: DateTime<Utc>,
    ) -> AppResult<LoanRecord> {
        let closed = sqlx::query_as::<_, LoanRecord>(
            r#"
            UPDATE loans
            SET status = 'returned', return_date = $2
            WHERE id = $1 AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(return_date)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(loan) = closed {
            return Ok(loan);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE id = $1)")
            .bind(loan_id)
            .fetch_one(&mut *conn)
            .await?;

        if exists {
            Err(AppError::AlreadyReturned(format!(
                "Loan {} is already returned",
                loan_id
            )))
        } else {
            Err(AppError::NotFound(format!("Loan with id {} not found", loan_id)))
        }
    }

    /// Active loans held by a member, oldest first
    pub async fn list_active_by_member(&self, member_id: i32) -> AppResult<Vec<LoanRecord>> {
        let loans = sqlx::query_as::<_, LoanRecord>(
            r#"
            SELECT * FROM loans
            WHERE member_id = $1 AND status = 'active'
            ORDER BY loan_date
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Closed loans of a member, optionally narrowed to one item, newest first
    pub async fn list_history_by_member(
        &self,
        member_id: i32,
        item_id: Option<i32>,
    ) -> AppResult<Vec<LoanRecord>> {
        let loans = sqlx::query_as::<_, LoanRecord>(
            r#"
            SELECT * FROM loans
            WHERE member_id = $1
              AND status = 'returned'
              AND ($2::int IS NULL OR item_id = $2)
            ORDER BY return_date DESC
            "#,
        )
        .bind(member_id)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }
}
