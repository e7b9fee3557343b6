//! Business logic services

pub mod checkout;
pub mod loans;
pub mod overdue;
pub mod returns;

use crate::{config::LoansConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub checkout: checkout::CheckoutService,
    pub returns: returns::ReturnsService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, loans_config: LoansConfig) -> Self {
        Self {
            checkout: checkout::CheckoutService::new(repository.clone(), loans_config),
            returns: returns::ReturnsService::new(repository.clone()),
            loans: loans::LoansService::new(repository),
        }
    }
}
