//! minibank
//!
//! A Postgres-backed transfer engine that moves funds between accounts under
//! concurrent access. Concurrent transfers acquire row locks in a global
//! lexicographic order (no deadlocks), every step is one atomic transaction
//! (no money created or destroyed), and every attempt that reaches the
//! balance check leaves an immutable ledger row (full audit trail).
//!
//! Account CRUD, authentication, and the HTTP surface live in the embedding
//! service; this crate owns balances and the ledger.

pub mod account_store;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;

pub use config::Config;
pub use domain::{
    Amount, AmountError, Balance, DomainError, FixedIdentity, IdentityProvider, Principal,
};
pub use engine::{TransferCommand, TransferEngine, TransferOutcome};
pub use error::{AppError, AppResult};
pub use ledger::{Ledger, LedgerEntry, TransactionStatus};
