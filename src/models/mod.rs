//! Data models for the circulation core

pub mod item;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use item::{Availability, Item};
pub use loan::{DueStatus, LoanRecord, LoanStatus, LoanView};
pub use member::Member;
