//! Item (circulating resource) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Item row from the database.
///
/// `available_copies` is owned by the inventory ledger: it equals
/// `total_copies` minus the number of currently active loans on the item,
/// and is only ever mutated by the checkout and return coordinators.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Copy counts for a single item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Availability {
    pub total: i32,
    pub available: i32,
}
