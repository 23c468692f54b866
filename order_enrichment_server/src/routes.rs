//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database
//! operations, etc.) should be expressed as futures or asynchronous functions, which get executed concurrently by
//! worker threads without blocking.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use order_enrichment_engine::{
    db_types::{NewOrder, OrderId},
    traits::{EnrichedStore, OrderStore},
    OrderApi,
    StreamConsumer,
};
use uuid::Uuid;

use crate::{
    data_objects::{ChangeEventBatch, NewOrderRequest, OrderCreatedResponse, StreamBatchResult},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro. Every
// resource registered this way answers requests with the wrong method with a 405, since only POST makes sense on
// these endpoints.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>)
                    .default_service(actix_web::web::route().to($crate::routes::method_not_allowed));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().body("Method Not Allowed")
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Ingestion  ----------------------------------------------------
route!(new_order => Post "/orders" impl OrderStore);
/// Route handler for the order creation endpoint.
///
/// Accepts `{customer?: string, amount: string|number}`, validates and normalises the amount into an exact decimal,
/// assigns a fresh order id and writes the order to the primary store. The store's change feed takes it from there;
/// this handler returns as soon as the order is durably stored, without waiting for enrichment.
///
/// Monetary values never appear as raw numbers in the response; the only decimal this endpoint returns is already
/// inside the order id string.
pub async fn new_order<B: OrderStore>(
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let amount = request.amount()?;
    let customer = request.customer.unwrap_or_else(|| "anonymous".to_string());
    let order = NewOrder::new(OrderId(Uuid::new_v4().to_string()), customer, amount);
    trace!("🧾️ POST {order}");
    let (order, _) = api.process_new_order(order).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Created().json(OrderCreatedResponse::new(order.order_id)))
}

//----------------------------------------------   Stream   ----------------------------------------------------
route!(stream_batch => Post "/stream/batch" impl EnrichedStore);
/// Route handler for the stream trigger endpoint.
///
/// This is the boundary an external redelivery mechanism calls with a batch of change events. The response is always
/// a 200 once the batch has been processed to completion; per-event failures are listed in the body so the caller
/// can redeliver only the failed subset. Redelivering an already-written event is harmless, since the write is an
/// idempotent overwrite.
pub async fn stream_batch<S: EnrichedStore>(
    body: web::Json<ChangeEventBatch>,
    consumer: web::Data<StreamConsumer<S>>,
) -> HttpResponse {
    let batch = body.into_inner();
    trace!("🌊️ Received a stream trigger with {} records", batch.records.len());
    let report = consumer.process_batch(batch.records).await;
    if !report.ok() {
        warn!("🌊️ Stream trigger batch had failures. {}", report.summary());
    }
    HttpResponse::Ok().json(StreamBatchResult::from(&report))
}
