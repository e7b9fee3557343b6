//! Repository layer for database operations

pub mod inventory;
pub mod loans;
pub mod members;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub inventory: inventory::InventoryLedger,
    pub loans: loans::LoanRegistry,
    pub members: members::MembersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            inventory: inventory::InventoryLedger::new(pool.clone()),
            loans: loans::LoanRegistry::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            pool,
        }
    }
}
