use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use order_enrichment_engine::{
    events::{EventHandlers, EventHooks, EventProducer},
    feed::run_change_feed,
    OrderApi,
    SqliteDatabase,
    StreamConsumer,
};
use tokio::sync::mpsc;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, NewOrderRoute, StreamBatchRoute},
};

const EVENT_BUFFER_SIZE: usize = 100;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mut hooks = EventHooks::default();
    hooks.on_order_enriched(|ev| {
        Box::pin(async move {
            info!("🪝️ Order {} enriched. total: {}", ev.enriched.order_id, ev.enriched.total);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let (feed_tx, feed_rx) = mpsc::channel(EVENT_BUFFER_SIZE);
    let db = SqliteDatabase::new_with_url(&config.database_url, 25, &config.orders_table, &config.enriched_table)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?
        .with_change_feed(EventProducer::new(feed_tx));
    let consumer = StreamConsumer::new(db.clone(), config.tax_rate, producers);
    let _feed_worker = tokio::spawn(run_change_feed(feed_rx, consumer.clone(), config.feed_batch_size));
    let srv = create_server_instance(config, db, consumer)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    consumer: StreamConsumer<SqliteDatabase>,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let order_api = OrderApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("oeg::access_log"))
            .app_data(web::Data::new(order_api))
            .app_data(web::Data::new(consumer.clone()))
            .service(health)
            .service(NewOrderRoute::<SqliteDatabase>::new())
            .service(StreamBatchRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
