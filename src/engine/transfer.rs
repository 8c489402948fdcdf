//! Transfer Engine
//!
//! Orchestrates one transfer as a single atomic step: ordered lock
//! acquisition, ownership check, balance mutation, and ledger recording all
//! happen inside one database transaction. Either every effect commits or
//! none do.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::account_store::{Account, AccountStore};
use crate::config::Config;
use crate::domain::{Amount, DomainError, Principal};
use crate::engine::lock_order::lock_order;
use crate::error::AppError;
use crate::ledger::{Ledger, LedgerEntry, TransactionStatus};

use super::{TransferCommand, TransferOutcome};

/// Attempts per transfer before a lock-wait timeout is surfaced to the
/// caller. Nothing has committed when a wait times out, so the whole step
/// can be retried safely.
const MAX_LOCK_RETRIES: u32 = 3;

/// Default bound on how long one step may wait for a row lock.
const DEFAULT_LOCK_WAIT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Engine for moving funds between accounts.
#[derive(Debug, Clone)]
pub struct TransferEngine {
    accounts: AccountStore,
    ledger: Ledger,
    pool: PgPool,
    lock_wait_timeout: Duration,
}

impl TransferEngine {
    pub fn new(pool: PgPool) -> Self {
        Self::with_lock_wait_timeout(pool, DEFAULT_LOCK_WAIT_TIMEOUT)
    }

    pub fn with_lock_wait_timeout(pool: PgPool, lock_wait_timeout: Duration) -> Self {
        Self {
            accounts: AccountStore::new(pool.clone()),
            ledger: Ledger::new(pool.clone()),
            pool,
            lock_wait_timeout,
        }
    }

    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::with_lock_wait_timeout(
            pool,
            Duration::from_millis(config.lock_wait_timeout_ms),
        )
    }

    /// Transfer `command.amount` from `command.from_number` to
    /// `command.to_number` on behalf of `principal`.
    ///
    /// Insufficient funds is a processed outcome, not an error: it commits a
    /// FAILED ledger row and returns `Ok` with that status. Validation,
    /// not-found, and ownership failures return `Err` and leave no trace in
    /// the ledger.
    ///
    /// A bounded lock wait protects against indefinite blocking; a timed-out
    /// step is retried a few times before [`AppError::LockTimeout`] is
    /// surfaced as retryable.
    pub async fn transfer(
        &self,
        command: &TransferCommand,
        principal: Principal,
    ) -> Result<TransferOutcome, AppError> {
        let from_number = command.from_number.trim();
        let to_number = command.to_number.trim();

        if from_number == to_number {
            return Err(DomainError::SameAccountTransfer.into());
        }

        for attempt in 0..MAX_LOCK_RETRIES {
            match self
                .try_transfer(from_number, to_number, &command.amount, principal)
                .await
            {
                Err(AppError::LockTimeout) if attempt < MAX_LOCK_RETRIES - 1 => {
                    let delay = Duration::from_millis(50 * (attempt as u64 + 1));
                    tracing::warn!(
                        from = from_number,
                        to = to_number,
                        "Lock wait timed out, retrying (attempt {}/{})",
                        attempt + 1,
                        MAX_LOCK_RETRIES
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                other => return other,
            }
        }

        Err(AppError::LockTimeout)
    }

    /// One atomic transfer step (single attempt).
    async fn try_transfer(
        &self,
        from_number: &str,
        to_number: &str,
        amount: &Amount,
        principal: Principal,
    ) -> Result<TransferOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // Bound the row-lock wait for this step. Postgres raises 55P03 when
        // the bound is hit, which maps to AppError::LockTimeout.
        sqlx::query(&format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.lock_wait_timeout.as_millis()
        ))
        .execute(&mut *tx)
        .await?;

        // Lock both rows in the resolved global order. Any concurrent
        // transfer over the same pair waits here rather than deadlocking.
        let (first, second) = lock_order(from_number, to_number);
        let first_account = self.lock_account(&mut tx, first).await?;
        let second_account = self.lock_account(&mut tx, second).await?;

        // Re-associate the locked rows with the logical transfer direction.
        let (mut from_account, mut to_account) = if first_account.number == from_number {
            (first_account, second_account)
        } else {
            (second_account, first_account)
        };

        if from_account.owner_id != principal.id() {
            // Dropping the transaction rolls back and releases both locks.
            return Err(DomainError::NotAccountOwner.into());
        }

        let occurred_at = Utc::now();

        if !from_account.balance.is_sufficient_for(amount) {
            // Business failure: balances stay untouched, but the attempt is
            // still committed to the ledger for audit.
            let transaction_id = self
                .ledger
                .append(
                    &mut tx,
                    &from_account,
                    &to_account,
                    amount,
                    occurred_at,
                    TransactionStatus::Failed,
                )
                .await?;
            tx.commit().await?;

            tracing::debug!(
                transaction_id,
                from = %from_account.number,
                to = %to_account.number,
                "Transfer rejected: insufficient funds"
            );

            return Ok(build_outcome(
                transaction_id,
                TransactionStatus::Failed,
                "Insufficient funds",
                &from_account,
                &to_account,
                amount,
                occurred_at,
            ));
        }

        from_account.balance = from_account.balance.debit(amount)?;
        to_account.balance = to_account.balance.credit(amount)?;

        self.accounts.save_balance(&mut tx, &from_account).await?;
        self.accounts.save_balance(&mut tx, &to_account).await?;

        let transaction_id = self
            .ledger
            .append(
                &mut tx,
                &from_account,
                &to_account,
                amount,
                occurred_at,
                TransactionStatus::Success,
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            transaction_id,
            from = %from_account.number,
            to = %to_account.number,
            amount = %amount,
            "Transfer committed"
        );

        Ok(build_outcome(
            transaction_id,
            TransactionStatus::Success,
            "Transfer successful",
            &from_account,
            &to_account,
            amount,
            occurred_at,
        ))
    }

    async fn lock_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        number: &str,
    ) -> Result<Account, AppError> {
        self.accounts
            .lock_for_update(tx, number)
            .await?
            .ok_or_else(|| AppError::from(DomainError::AccountNotFound(number.to_string())))
    }

    /// Transaction history for an account the principal owns, most recent
    /// first. Takes no row locks.
    ///
    /// # Errors
    /// `DomainError::AccountNotFound` when the account does not exist or is
    /// not owned by `principal` (ownership is not disclosed separately).
    pub async fn history(
        &self,
        account_id: uuid::Uuid,
        principal: Principal,
    ) -> Result<Vec<LedgerEntry>, AppError> {
        self.accounts
            .find_by_id_and_owner(account_id, principal)
            .await?
            .ok_or_else(|| AppError::from(DomainError::AccountNotFound(account_id.to_string())))?;

        Ok(self.ledger.history_for(account_id).await?)
    }
}

fn build_outcome(
    transaction_id: i64,
    status: TransactionStatus,
    message: &str,
    from: &Account,
    to: &Account,
    amount: &Amount,
    occurred_at: DateTime<Utc>,
) -> TransferOutcome {
    TransferOutcome {
        transaction_id,
        status,
        message: message.to_string(),
        from_account_id: from.id,
        from_account_number: from.number.clone(),
        to_account_id: to.id,
        to_account_number: to.number.clone(),
        amount: amount.value(),
        occurred_at,
    }
}
