//! Repository layer for the Postgres store.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return raw rows; decoding
//! into domain types happens in [`crate::postgres`].

pub mod account_repo;
pub mod audit_repo;
pub mod lock_repo;

pub use account_repo::AccountRepo;
pub use audit_repo::AuditRepo;
pub use lock_repo::LockRepo;
