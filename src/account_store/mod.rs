//! Account Store
//!
//! Row-level persistence for accounts. The transfer engine is the only
//! writer of balances; it locks rows with `SELECT ... FOR UPDATE` inside its
//! own transaction, so every method that can touch a locked row takes the
//! enclosing `Transaction` rather than the pool.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{Balance, Principal};

/// A bank account row.
///
/// `number` is the human-readable surface key (unique, <= 50 chars) used for
/// lookups and lock ordering; `id` is the stable internal identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub number: String,
    pub name: String,
    pub balance: Balance,
    pub owner_id: Uuid,
}

type AccountRow = (Uuid, String, String, Decimal, Uuid);

impl Account {
    fn from_row(row: AccountRow) -> Self {
        let (id, number, name, balance, owner_id) = row;
        Self {
            id,
            number,
            name,
            // Column carries CHECK (balance >= 0)
            balance: Balance::from_row_value(balance),
            owner_id,
        }
    }
}

/// Store for account rows.
#[derive(Debug, Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Acquire an exclusive, transaction-scoped lock on the account row
    /// identified by `number` and return its current state.
    ///
    /// Blocks while another in-flight transfer holds the same row, subject to
    /// the `lock_timeout` applied by the caller's transaction. The lock is
    /// released when the enclosing transaction commits or rolls back.
    ///
    /// `None` is the normal not-found outcome, not a failure.
    pub async fn lock_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        number: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, number, name, balance, owner_id
            FROM accounts
            WHERE number = $1
            FOR UPDATE
            "#,
        )
        .bind(number)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(Account::from_row))
    }

    /// Persist a balance change. Visible to other readers only after the
    /// enclosing transaction commits.
    pub async fn save_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: &Account,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET balance = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(account.balance.value())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Non-locking read of an account scoped to its owner. Used by the
    /// history path, which never takes row locks.
    pub async fn find_by_id_and_owner(
        &self,
        id: Uuid,
        owner: Principal,
    ) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, number, name, balance, owner_id
            FROM accounts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner.id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from_row))
    }
}
