//! The in-process change feed: the push boundary between the primary store and the stream consumer.
use log::*;
use tokio::sync::mpsc;

use crate::{consumer::StreamConsumer, stream_types::ChangeEvent, traits::EnrichedStore};

/// Runs the change-feed worker until the feed channel closes. Spawn this on the runtime at startup; it does not
/// return while the primary store holds a sender.
///
/// The worker drains the channel into batches of at most `batch_size` events and hands each batch to the stream
/// consumer. Failed events are logged here; the worker does not redeliver them itself — delivery is at least once
/// from the store's side, and the consumer's writes are idempotent, so a redelivering boundary can simply replay.
pub async fn run_change_feed<S>(mut events: mpsc::Receiver<ChangeEvent>, consumer: StreamConsumer<S>, batch_size: usize)
where S: EnrichedStore {
    info!("🚚️ Change feed worker started");
    while let Some(first) = events.recv().await {
        let mut batch = vec![first];
        while batch.len() < batch_size {
            match events.try_recv() {
                Ok(event) => batch.push(event),
                Err(_) => break,
            }
        }
        trace!("🚚️ Dispatching a batch of {} change events", batch.len());
        let report = consumer.process_batch(batch).await;
        if report.ok() {
            debug!("🚚️ {}", report.summary());
        } else {
            for (index, outcome) in report.failures() {
                error!("🚚️ Event {index} of the batch failed. {outcome}");
            }
        }
    }
    info!("🚚️ Change feed worker shutting down");
}
