//! # SQLite database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction as
//! the need arises and call through to the functions without any other changes.
//!
//! Table names are configuration, not constants, so every function also takes the table it operates on.
use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod enriched;
pub mod orders;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Creates the order and enriched-order tables if they do not exist yet.
pub async fn create_schema(pool: &SqlitePool, orders_table: &str, enriched_table: &str) -> Result<(), SqlxError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {orders_table} (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id    TEXT NOT NULL UNIQUE,
            customer_id TEXT NOT NULL,
            amount      TEXT NOT NULL,
            created_at  INTEGER NOT NULL
        );
        "#
    ))
    .execute(pool)
    .await?;
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {enriched_table} (
            order_id TEXT PRIMARY KEY,
            subtotal TEXT NOT NULL,
            tax      TEXT NOT NULL,
            total    TEXT NOT NULL,
            status   TEXT NOT NULL
        );
        "#
    ))
    .execute(pool)
    .await?;
    Ok(())
}
