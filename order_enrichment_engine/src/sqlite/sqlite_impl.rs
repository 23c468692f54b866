//! `SqliteDatabase` is a concrete implementation of both store adapters.
//!
//! Unsurprisingly, it uses SQLite as the backend: the primary store and the secondary store are two tables in the
//! same database. The change-event feed is wired in at construction time with [`SqliteDatabase::with_change_feed`];
//! a first-time order insert publishes an `INSERT` event into it, which is what pulls new orders through the
//! enrichment pipeline.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{create_schema, enriched, new_pool, orders};
use crate::{
    db_types::{EnrichedOrder, NewOrder, Order, OrderId},
    events::EventProducer,
    stream_types::ChangeEvent,
    traits::{EnrichedStore, OrderStore, StoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
    orders_table: String,
    enriched_table: String,
    feed: Option<EventProducer<ChangeEvent>>,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`, creating it and its tables if needed. The returned instance has no change
    /// feed attached; call [`Self::with_change_feed`] to wire one in.
    pub async fn new_with_url(
        url: &str,
        max_connections: u32,
        orders_table: &str,
        enriched_table: &str,
    ) -> Result<Self, StoreError> {
        let pool = new_pool(url, max_connections).await?;
        create_schema(&pool, orders_table, enriched_table).await?;
        Ok(Self {
            url: url.to_string(),
            pool,
            orders_table: orders_table.to_string(),
            enriched_table: enriched_table.to_string(),
            feed: None,
        })
    }

    /// Attaches the change-event feed that insert notifications are published into.
    pub fn with_change_feed(mut self, feed: EventProducer<ChangeEvent>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn publish_insert(&self, order: &Order) {
        if let Some(feed) = &self.feed {
            trace!("📝️ Publishing INSERT change event for order {}", order.order_id);
            feed.publish_event(ChangeEvent::insert_snapshot(order)).await;
        }
    }
}

impl OrderStore for SqliteDatabase {
    fn table_name(&self) -> &str {
        &self.orders_table
    }

    async fn put_order(&self, order: NewOrder) -> Result<(Order, bool), StoreError> {
        let mut conn = self.pool.acquire().await?;
        let (order, inserted) = orders::idempotent_insert(order, &mut conn, &self.orders_table).await?;
        // Duplicates emit no event. The store's feed carries one INSERT per key, ever.
        if inserted {
            self.publish_insert(&order).await;
        }
        Ok((order, inserted))
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_order_id(order_id, &mut conn, &self.orders_table).await
    }
}

impl EnrichedStore for SqliteDatabase {
    fn table_name(&self) -> &str {
        &self.enriched_table
    }

    async fn put_enriched(&self, record: EnrichedOrder) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        enriched::upsert_enriched(record, &mut conn, &self.enriched_table).await
    }

    async fn fetch_enriched(&self, order_id: &OrderId) -> Result<Option<EnrichedOrder>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        enriched::fetch_enriched_by_order_id(order_id, &mut conn, &self.enriched_table).await
    }
}
