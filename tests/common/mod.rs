//! Common test utilities

use minibank::{db, Config};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool};
use std::sync::Once;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Load test configuration from the environment (and .env if present).
pub fn test_config() -> Config {
    dotenvy::dotenv().ok();
    Config::from_env().expect("DATABASE_URL must be set for tests")
}

/// Connect to the test database and make sure the schema is in place.
///
/// Tests seed their own uniquely-numbered accounts and assert only on rows
/// they created, so suites can run in parallel against one database.
pub async fn setup_test_db() -> PgPool {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "minibank=debug".into()),
            )
            .try_init()
            .ok();
    });

    let pool = db::connect_from_env()
        .await
        .expect("Failed to connect to DB");
    db::verify_connection(&pool)
        .await
        .expect("Database is not reachable");

    pool.execute(include_str!("../../migrations/0001_create_core_tables.sql"))
        .await
        .expect("Failed to apply schema");

    assert!(
        db::check_schema(&pool).await.expect("Schema check failed"),
        "required tables missing after applying migrations"
    );

    pool
}

/// Make an account number unique to this test run.
pub fn unique_number(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

/// Insert an account row directly, the way the account directory would.
pub async fn seed_account(
    pool: &PgPool,
    number: &str,
    balance: Decimal,
    owner_id: Uuid,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO accounts (id, number, name, balance, owner_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(number)
    .bind(format!("{number} account"))
    .bind(balance)
    .bind(owner_id)
    .execute(pool)
    .await
    .expect("Failed to seed account");

    id
}

/// Read a committed balance back.
pub async fn fetch_balance(pool: &PgPool, account_id: Uuid) -> Decimal {
    sqlx::query_scalar("SELECT balance FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("Failed to fetch balance")
}

/// Count ledger rows touching the account on either side.
pub async fn count_transactions(pool: &PgPool, account_id: Uuid) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions WHERE from_account_id = $1 OR to_account_id = $1",
    )
    .bind(account_id)
    .fetch_one(pool)
    .await
    .expect("Failed to count transactions")
}
