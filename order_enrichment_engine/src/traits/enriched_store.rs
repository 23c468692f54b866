use crate::{
    db_types::{EnrichedOrder, OrderId},
    traits::StoreError,
};

/// The write path of the secondary store.
#[allow(async_fn_in_trait)]
pub trait EnrichedStore {
    /// The name of the secondary store table this backend writes to.
    fn table_name(&self) -> &str;

    /// Writes the enriched record, unconditionally overwriting any existing record with the same `order_id`. No
    /// compare-and-swap is needed: all possible writes for a given key are value-identical, so the last write wins
    /// and duplicate deliveries commute.
    async fn put_enriched(&self, record: EnrichedOrder) -> Result<(), StoreError>;

    /// Fetches the enriched record for the given order id, or `None` if it has not been written yet.
    async fn fetch_enriched(&self, order_id: &OrderId) -> Result<Option<EnrichedOrder>, StoreError>;
}
