//! Customer duplicate detection domain.
//!
//! Pure matching logic, the record store abstraction with an in-memory
//! implementation, and the registration service. No database access.

pub mod customer;
pub mod error;
pub mod service;
pub mod store;
pub mod types;
