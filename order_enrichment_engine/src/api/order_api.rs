use std::fmt::Debug;

use log::*;
use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderId},
    traits::{OrderStore, StoreError},
};

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
}

/// `OrderApi` is the ingestion seam between the synchronous front end and the primary store.
///
/// The store insert is idempotent, and a first-time insert triggers the change event that pulls the order through
/// the asynchronous enrichment pipeline. The API itself does not know about the pipeline; it only talks to the
/// primary store.
pub struct OrderApi<B> {
    db: B,
}

impl<B> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi")
    }
}

impl<B> OrderApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderApi<B>
where B: OrderStore
{
    /// Submits a new order to the primary store. Returns the stored order, and whether this call actually created
    /// it (`false` means an order with this id already existed and nothing was written).
    pub async fn process_new_order(&self, order: NewOrder) -> Result<(Order, bool), OrderApiError> {
        let (order, inserted) = self.db.put_order(order).await?;
        if inserted {
            debug!("🧾️ Order {} accepted. {}", order.order_id, order.amount);
        } else {
            info!("🧾️ Order {} already exists. Nothing to do.", order.order_id);
        }
        Ok((order, inserted))
    }

    /// Fetches an order from the primary store.
    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError> {
        let order = self.db.fetch_order(order_id).await?;
        Ok(order)
    }
}
