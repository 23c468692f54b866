use crate::db_types::EnrichedOrder;

/// Emitted after the stream consumer has successfully written an enriched order to the secondary store. Duplicate
/// event deliveries produce duplicate emissions; subscribers must be tolerant of that, just like the store is.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEnrichedEvent {
    pub enriched: EnrichedOrder,
}

impl OrderEnrichedEvent {
    pub fn new(enriched: EnrichedOrder) -> Self {
        Self { enriched }
    }
}
