//! Ledger (Transaction Store)
//!
//! Append-only record of every transfer attempt that reached the balance
//! check, successful or not. This is the single source of truth for audit
//! and history; rows are never mutated or deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::account_store::Account;
use crate::domain::Amount;

/// Outcome recorded on a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            other => Err(format!("unknown transaction status: {other}")),
        }
    }
}

/// A ledger row joined with both sides' account identity, as returned by
/// history queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub from_account_id: Uuid,
    pub from_account_number: String,
    pub to_account_id: Uuid,
    pub to_account_number: String,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub status: TransactionStatus,
}

type LedgerRow = (
    i64,
    Uuid,
    String,
    Uuid,
    String,
    Decimal,
    DateTime<Utc>,
    String,
);

/// Append-only store of transaction records.
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: PgPool,
}

impl Ledger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one transaction row inside the enclosing transfer transaction
    /// and return its assigned id. Ids are monotonically increasing and
    /// never reused.
    pub async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        from: &Account,
        to: &Account,
        amount: &Amount,
        occurred_at: DateTime<Utc>,
        status: TransactionStatus,
    ) -> Result<i64, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (from_account_id, to_account_id, amount, occurred_at, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(from.id)
        .bind(to.id)
        .bind(amount.value())
        .bind(occurred_at)
        .bind(status.as_str())
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }

    /// All transactions where the account is either side, most recent first
    /// (ties broken by descending id). Reads outside any row lock.
    pub async fn history_for(&self, account_id: Uuid) -> Result<Vec<LedgerEntry>, sqlx::Error> {
        let rows: Vec<LedgerRow> = sqlx::query_as(
            r#"
            SELECT t.id,
                   t.from_account_id, fa.number,
                   t.to_account_id, ta.number,
                   t.amount, t.occurred_at, t.status
            FROM transactions t
            JOIN accounts fa ON fa.id = t.from_account_id
            JOIN accounts ta ON ta.id = t.to_account_id
            WHERE t.from_account_id = $1
               OR t.to_account_id = $1
            ORDER BY t.occurred_at DESC, t.id DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, from_id, from_number, to_id, to_number, amount, occurred_at, status)| {
                let status = status
                    .parse::<TransactionStatus>()
                    .map_err(|e| sqlx::Error::Decode(e.into()))?;
                Ok(LedgerEntry {
                    id,
                    from_account_id: from_id,
                    from_account_number: from_number,
                    to_account_id: to_id,
                    to_account_number: to_number,
                    amount,
                    occurred_at,
                    status,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(TransactionStatus::Success.as_str(), "SUCCESS");
        assert_eq!(TransactionStatus::Failed.as_str(), "FAILED");
        assert_eq!("SUCCESS".parse::<TransactionStatus>().unwrap(), TransactionStatus::Success);
        assert_eq!("FAILED".parse::<TransactionStatus>().unwrap(), TransactionStatus::Failed);
    }

    #[test]
    fn test_status_unknown_rejected() {
        let result = "PENDING".parse::<TransactionStatus>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("PENDING"));
    }
}
