use mockall::mock;
use order_enrichment_engine::{
    db_types::{NewOrder, Order, OrderId},
    traits::{OrderStore, StoreError},
};

mock! {
    pub OrderStoreBackend {}
    impl OrderStore for OrderStoreBackend {
        fn table_name(&self) -> &str;
        async fn put_order(&self, order: NewOrder) -> Result<(Order, bool), StoreError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;
    }
}

/// Echoes the submitted order back as if the store had inserted it.
pub fn stored_order(order: NewOrder) -> Order {
    Order {
        id: 1,
        order_id: order.order_id,
        customer_id: order.customer_id,
        amount: order.amount,
        created_at: order.created_at,
    }
}
