//! Transfer engine
//!
//! The core of the system: deadlock-free ordered locking, atomic balance
//! mutation, and ledger recording.

pub mod commands;
pub mod lock_order;
pub mod transfer;

pub use commands::{TransferCommand, TransferOutcome};
pub use lock_order::lock_order;
pub use transfer::TransferEngine;
