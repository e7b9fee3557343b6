//! API handlers for the circulation REST endpoints
//!
//! Authentication and session handling live in a fronting layer outside this
//! core; handlers receive already-validated identifiers.

pub mod health;
pub mod items;
pub mod loans;
pub mod openapi;
