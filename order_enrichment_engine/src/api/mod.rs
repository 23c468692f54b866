mod order_api;

pub use order_api::{OrderApi, OrderApiError};
