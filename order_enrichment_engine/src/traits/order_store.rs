use crate::{
    db_types::{NewOrder, Order, OrderId},
    traits::StoreError,
};

/// The write path of the primary store.
///
/// The change-event feed is not part of this trait: backends are handed their feed channel at construction time and
/// publish into it when, and only when, `put_order` actually inserts a row.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// The name of the primary store table this backend writes to.
    fn table_name(&self) -> &str;

    /// Stores a new order. This call is idempotent: if an order with the same `order_id` already exists, the
    /// existing record is returned and the second element is `false`, and no change event is emitted.
    async fn put_order(&self, order: NewOrder) -> Result<(Order, bool), StoreError>;

    /// Fetches the order with the given id, or `None` if it does not exist.
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;
}
