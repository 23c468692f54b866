//! The stream consumer: drives a batch of change events through filter → decode → enrich → write.
use std::fmt::{Debug, Display};

use futures_util::future::join_all;
use log::*;
use oeg_common::TaxRate;
use thiserror::Error;

use crate::{
    db_types::{EnrichedOrder, OrderId},
    enrichment::enrich,
    events::{EventProducers, OrderEnrichedEvent},
    stream_types::{ChangeEvent, ChangeEventKind, DecodeError},
    traits::{EnrichedStore, StoreError},
};

//--------------------------------------      StreamError      -------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    #[error("Could not decode the change event. {0}")]
    Decode(#[from] DecodeError),
    #[error("Could not write the enriched order. {0}")]
    Write(#[from] StoreError),
}

//--------------------------------------      EventOutcome     -------------------------------------------------------
/// What happened to a single change event. Every event in a batch gets exactly one of these; nothing is skipped
/// silently.
#[derive(Debug, Clone)]
pub enum EventOutcome {
    /// The event was an insert, and the enriched order was written to the secondary store.
    Written { order_id: OrderId },
    /// The event was not an insert. Orders are immutable by contract, so there is nothing to do.
    Skipped { kind: ChangeEventKind },
    /// The event could not be decoded, or the write failed. The order id is reported when it could be extracted.
    Failed { order_id: Option<OrderId>, error: StreamError },
}

impl Display for EventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOutcome::Written { order_id } => write!(f, "order {order_id} enriched"),
            EventOutcome::Skipped { kind } => write!(f, "{kind} event skipped"),
            EventOutcome::Failed { order_id: Some(order_id), error } => write!(f, "order {order_id} failed: {error}"),
            EventOutcome::Failed { order_id: None, error } => write!(f, "failed: {error}"),
        }
    }
}

//--------------------------------------      BatchReport      -------------------------------------------------------
/// The per-event outcomes for one batch, in input order.
///
/// The consumer always processes a batch to completion; the report is how per-event failures reach the boundary that
/// triggered the batch, so that a host supporting partial-batch redelivery can redrive only the failed subset.
#[derive(Debug, Clone)]
pub struct BatchReport {
    outcomes: Vec<EventOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[EventOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// `true` iff no event in the batch failed. Skipped events are not failures.
    pub fn ok(&self) -> bool {
        !self.outcomes.iter().any(|o| matches!(o, EventOutcome::Failed { .. }))
    }

    pub fn written_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, EventOutcome::Written { .. })).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, EventOutcome::Skipped { .. })).count()
    }

    /// The failed events, paired with their position in the batch.
    pub fn failures(&self) -> Vec<(usize, &EventOutcome)> {
        self.outcomes.iter().enumerate().filter(|(_, o)| matches!(o, EventOutcome::Failed { .. })).collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} events: {} written, {} skipped, {} failed",
            self.len(),
            self.written_count(),
            self.skipped_count(),
            self.failures().len()
        )
    }
}

//--------------------------------------     StreamConsumer    -------------------------------------------------------
/// `StreamConsumer` is the primary API for handling change-event batches from the primary store's feed.
///
/// Each event in a batch is processed independently and concurrently; events carry no cross-event dependency, and
/// the only shared resource is the store backend, which must be safe for concurrent use. Failures are isolated per
/// event and collected into the [`BatchReport`]; a batch is never aborted part-way.
#[derive(Clone)]
pub struct StreamConsumer<S> {
    store: S,
    rate: TaxRate,
    producers: EventProducers,
}

impl<S> Debug for StreamConsumer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StreamConsumer (rate: {})", self.rate)
    }
}

impl<S> StreamConsumer<S> {
    pub fn new(store: S, rate: TaxRate, producers: EventProducers) -> Self {
        Self { store, rate, producers }
    }
}

impl<S> StreamConsumer<S>
where S: EnrichedStore
{
    /// Processes one batch of change events and reports the outcome of every event.
    pub async fn process_batch(&self, events: Vec<ChangeEvent>) -> BatchReport {
        trace!("🌊️ Received a batch of {} change events", events.len());
        let outcomes = join_all(events.into_iter().map(|ev| self.process_event(ev))).await;
        let report = BatchReport { outcomes };
        debug!("🌊️ Batch complete. {}", report.summary());
        report
    }

    async fn process_event(&self, event: ChangeEvent) -> EventOutcome {
        if event.kind != ChangeEventKind::Insert {
            trace!("🌊️ Skipping {} event", event.kind);
            return EventOutcome::Skipped { kind: event.kind };
        }
        let (order_id, amount) = match decode_insert(&event) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("🌊️ Could not decode change event. {e}");
                let order_id = event.as_string("order_id").ok().map(|s| OrderId(s.to_string()));
                return EventOutcome::Failed { order_id, error: e.into() };
            },
        };
        let record = enrich(amount, self.rate).into_enriched_order(order_id.clone());
        match self.store.put_enriched(record.clone()).await {
            Ok(()) => {
                debug!("🌊️ Order {} enriched. subtotal: {}, tax: {}, total: {}", order_id, record.subtotal, record.tax, record.total);
                self.call_order_enriched_hook(record).await;
                EventOutcome::Written { order_id }
            },
            Err(e) => {
                warn!("🌊️ Could not write enriched order {order_id}. {e}");
                EventOutcome::Failed { order_id: Some(order_id), error: e.into() }
            },
        }
    }

    async fn call_order_enriched_hook(&self, record: EnrichedOrder) {
        for emitter in &self.producers.order_enriched_producer {
            trace!("🌊️ Notifying order enriched hook subscribers");
            let event = OrderEnrichedEvent::new(record.clone());
            emitter.publish_event(event).await;
        }
    }
}

/// Extracts the fields the pipeline needs from an insert event: the order id (string-typed) and the amount
/// (numeric-typed, parsed with exact-decimal semantics).
fn decode_insert(event: &ChangeEvent) -> Result<(OrderId, oeg_common::Money), DecodeError> {
    let order_id = OrderId(event.as_string("order_id")?.to_string());
    let amount = event.as_numeric("amount")?;
    Ok((order_id, amount))
}
