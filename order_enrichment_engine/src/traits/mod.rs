//! # Storage seam
//!
//! This module defines the interface contracts that storage *backends* must expose in order to act as the primary or
//! secondary store for the enrichment pipeline.
//!
//! Both stores are plain put-by-key stores. The primary store holds immutable [`Order`](crate::db_types::Order)
//! records and, as a side effect of a first-time insert, emits a change event into the feed it was constructed with.
//! The secondary store holds [`EnrichedOrder`](crate::db_types::EnrichedOrder) records under unconditional
//! overwrite-by-key semantics, which is what makes redelivered events safe to reprocess.
//!
//! Backends are constructed explicitly and injected wherever they are needed; nothing in the engine reaches for a
//! process-wide client handle, so tests can substitute doubles freely.
mod enriched_store;
mod order_store;

use thiserror::Error;

pub use enriched_store::EnrichedStore;
pub use order_store::OrderStore;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The stored record is malformed: {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}
