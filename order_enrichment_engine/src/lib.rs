//! Order Enrichment Engine
//!
//! The Order Enrichment Engine ingests order records and asynchronously enriches each newly created record with
//! computed tax and total fields, publishing the enriched result to a secondary store. This library contains the core
//! logic for the pipeline. It is provider-agnostic.
//!
//! The library is divided into three main sections:
//! 1. The storage seam ([`mod@traits`]). The primary and secondary stores are plain put-by-key stores behind the
//!    [`OrderStore`] and [`EnrichedStore`] traits. Backends implement these traits to plug into the pipeline; SQLite
//!    is the backend that ships with the engine ([`SqliteDatabase`]). The primary store additionally emits a feed of
//!    [`stream_types::ChangeEvent`]s describing record-level mutations, delivered at least once.
//! 2. The enrichment pipeline. [`StreamConsumer`] receives batches of change events, filters out everything that is
//!    not an insert, decodes each event with exact-decimal semantics, computes the derived fields
//!    ([`enrichment::enrich`]) and writes the result to the secondary store as an idempotent overwrite. Every event
//!    is processed independently; a failing event never takes its siblings down with it.
//! 3. The public API objects ([`OrderApi`]) and the event hooks ([`mod@events`]). A simple channel-based hook system
//!    lets callers react to enrichment events, for example to log or forward each enriched order.
mod api;
mod consumer;

pub mod db_types;
pub mod enrichment;
pub mod events;
pub mod feed;
pub mod stream_types;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use api::{OrderApi, OrderApiError};
pub use consumer::{BatchReport, EventOutcome, StreamConsumer, StreamError};
