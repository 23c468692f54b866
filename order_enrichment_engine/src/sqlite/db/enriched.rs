use oeg_common::Money;
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{EnrichedOrder, OrderId},
    traits::StoreError,
};

#[derive(FromRow)]
struct EnrichedRow {
    order_id: String,
    subtotal: Money,
    tax: Money,
    total: Money,
    status: String,
}

impl TryFrom<EnrichedRow> for EnrichedOrder {
    type Error = StoreError;

    fn try_from(row: EnrichedRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|e| StoreError::CorruptRecord(format!("{e}")))?;
        Ok(EnrichedOrder {
            order_id: OrderId(row.order_id),
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            status,
        })
    }
}

/// Writes the enriched record, unconditionally replacing any existing row with the same `order_id`.
pub async fn upsert_enriched(record: EnrichedOrder, conn: &mut SqliteConnection, table: &str) -> Result<(), StoreError> {
    sqlx::query(&format!(
        r#"
            INSERT OR REPLACE INTO {table} (order_id, subtotal, tax, total, status)
            VALUES ($1, $2, $3, $4, $5);
        "#
    ))
    .bind(record.order_id)
    .bind(record.subtotal)
    .bind(record.tax)
    .bind(record.total)
    .bind(record.status.to_string())
    .execute(conn)
    .await?;
    Ok(())
}

/// Returns the enriched record for the corresponding `order_id`, if any.
pub async fn fetch_enriched_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Option<EnrichedOrder>, StoreError> {
    let row: Option<EnrichedRow> = sqlx::query_as(&format!("SELECT * FROM {table} WHERE order_id = $1"))
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    row.map(EnrichedOrder::try_from).transpose()
}
