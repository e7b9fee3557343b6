//! Circulation server
//!
//! Backend for library circulation: members borrow and return physical items,
//! and the loan registry and inventory ledger stay consistent under concurrent
//! requests. Exposes a REST JSON API for checkout, return and loan listings.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
