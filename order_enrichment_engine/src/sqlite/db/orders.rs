use chrono::DateTime;
use log::debug;
use oeg_common::Money;
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId},
    traits::StoreError,
};

// `created_at` lives in the table as whole seconds since the epoch.
#[derive(FromRow)]
struct OrderRow {
    id: i64,
    order_id: String,
    customer_id: String,
    amount: Money,
    created_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::from_timestamp(row.created_at, 0)
            .ok_or_else(|| StoreError::CorruptRecord(format!("created_at {} is out of range", row.created_at)))?;
        Ok(Order {
            id: row.id,
            order_id: OrderId(row.order_id),
            customer_id: row.customer_id,
            amount: row.amount,
            created_at,
        })
    }
}

/// Inserts the order into the database, returning `false` in the second element if the order already exists.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<(Order, bool), StoreError> {
    let inserted = match fetch_order_by_order_id(&order.order_id, conn, table).await? {
        Some(order) => (order, false),
        None => {
            let order = insert_order(order, conn, table).await?;
            debug!("📝️ Order [{}] inserted with id {}", order.order_id, order.id);
            (order, true)
        },
    };
    Ok(inserted)
}

/// Inserts a new order using the given connection. This is not atomic. You can embed this call inside a transaction
/// if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
async fn insert_order(order: NewOrder, conn: &mut SqliteConnection, table: &str) -> Result<Order, StoreError> {
    let row: OrderRow = sqlx::query_as(&format!(
        r#"
            INSERT INTO {table} (
                order_id,
                customer_id,
                amount,
                created_at
            ) VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#
    ))
    .bind(order.order_id)
    .bind(order.customer_id)
    .bind(order.amount)
    .bind(order.created_at.timestamp())
    .fetch_one(conn)
    .await?;
    Order::try_from(row)
}

/// Returns the entry in the orders table for the corresponding `order_id`, if any.
pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT * FROM {table} WHERE order_id = $1"))
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    row.map(Order::try_from).transpose()
}
