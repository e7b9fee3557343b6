//! Loan record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan lifecycle state, stored as text in the loans table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

/// Loan record from the database.
///
/// Created only by a successful checkout (status Active); transitions to
/// Returned only via the return coordinator, which stamps `return_date`.
/// `loan_date` and `due_date` never change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanRecord {
    pub id: i32,
    pub member_id: i32,
    pub item_id: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl LoanRecord {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

/// Checkout request passed from the API layer to the checkout coordinator
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub member_id: i32,
    pub item_id: i32,
    /// Defaults to the configured loan term when absent
    pub due_date: Option<DateTime<Utc>>,
}

/// Due/overdue classification of a loan at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DueStatus {
    OnTime { days_remaining: i64 },
    DueToday,
    Overdue { days_late: i64 },
    Returned,
}

/// Loan record enriched with its due status for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanView {
    pub id: i32,
    pub member_id: i32,
    pub item_id: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub due_status: DueStatus,
}

impl LoanView {
    pub fn new(record: LoanRecord, due_status: DueStatus) -> Self {
        Self {
            id: record.id,
            member_id: record.member_id,
            item_id: record.item_id,
            loan_date: record.loan_date,
            due_date: record.due_date,
            return_date: record.return_date,
            status: record.status,
            due_status,
        }
    }
}
