//! Pure domain logic for the LockPay ledger.
//!
//! This crate has zero internal dependencies and performs no I/O, so it can
//! be used by the storage layer, the ledger service, and the API crate alike.
//! It defines:
//!
//! - the shared type aliases ([`types`]),
//! - the ledger error taxonomy ([`error`]),
//! - claim-key derivation from a contact + PIN pair ([`claim`]),
//! - money representation and formatting ([`money`]),
//! - input validation rules ([`validation`]),
//! - the lock state machine ([`lock_state`]),
//! - lock reference codes ([`reference`]),
//! - audit record kinds and history descriptions ([`audit`]).

pub mod audit;
pub mod claim;
pub mod error;
pub mod lock_state;
pub mod money;
pub mod reference;
pub mod types;
pub mod validation;

pub use claim::ClaimKey;
pub use error::LedgerError;
pub use lock_state::LockState;
