//! Member model
//!
//! Member management (registration, profiles, authentication) lives outside
//! the circulation core; only the row needed for existence checks is modeled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
