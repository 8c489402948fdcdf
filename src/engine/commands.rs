//! Command and result definitions
//!
//! Commands represent intentions to move funds; outcomes report what the
//! engine decided and recorded.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Amount;
use crate::ledger::TransactionStatus;

/// Command to transfer funds between two accounts, identified by their
/// surface numbers. The amount is carried as a validated [`Amount`], so a
/// non-positive or malformed value cannot reach the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    pub from_number: String,
    pub to_number: String,
    pub amount: Amount,
}

impl TransferCommand {
    pub fn new(
        from_number: impl Into<String>,
        to_number: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            from_number: from_number.into(),
            to_number: to_number.into(),
            amount,
        }
    }
}

/// Result of a processed transfer. Carries the ledger row that recorded the
/// attempt: a FAILED status here is a normal outcome (insufficient funds),
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub transaction_id: i64,
    pub status: TransactionStatus,
    pub message: String,
    pub from_account_id: Uuid,
    pub from_account_number: String,
    pub to_account_id: Uuid,
    pub to_account_number: String,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

impl TransferOutcome {
    /// Whether funds actually moved.
    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }
}
