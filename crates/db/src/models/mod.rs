//! Ledger entity models and DTOs.
//!
//! Each submodule contains:
//! - A row struct matching the stored record (`FromRow` for the Postgres store)
//! - A typed domain struct where enum-valued columns are decoded
//! - Create DTOs for inserts and response DTOs for external-facing output

pub mod account;
pub mod audit;
pub mod lock;
