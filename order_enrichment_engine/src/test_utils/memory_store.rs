use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use crate::{
    db_types::{EnrichedOrder, OrderId},
    traits::{EnrichedStore, StoreError},
};

/// An in-memory secondary store for tests: a hash map behind a mutex, with optional per-key write-failure injection.
#[derive(Clone, Default)]
pub struct MemoryEnrichedStore {
    records: Arc<Mutex<HashMap<OrderId, EnrichedOrder>>>,
    fail_on: Arc<Mutex<HashSet<OrderId>>>,
}

impl MemoryEnrichedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `put_enriched` for `order_id` fail with a `DatabaseError`.
    pub fn fail_on(&self, order_id: OrderId) {
        self.fail_on.lock().unwrap().insert(order_id);
    }

    pub fn get(&self, order_id: &OrderId) -> Option<EnrichedOrder> {
        self.records.lock().unwrap().get(order_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EnrichedStore for MemoryEnrichedStore {
    fn table_name(&self) -> &str {
        "orders_enriched"
    }

    async fn put_enriched(&self, record: EnrichedOrder) -> Result<(), StoreError> {
        if self.fail_on.lock().unwrap().contains(&record.order_id) {
            return Err(StoreError::DatabaseError(format!("injected write failure for {}", record.order_id)));
        }
        self.records.lock().unwrap().insert(record.order_id.clone(), record);
        Ok(())
    }

    async fn fetch_enriched(&self, order_id: &OrderId) -> Result<Option<EnrichedOrder>, StoreError> {
        Ok(self.get(order_id))
    }
}
