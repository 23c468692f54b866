use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, OrderEnrichedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_enriched_producer: Vec<EventProducer<OrderEnrichedEvent>>,
}

pub struct EventHandlers {
    pub on_order_enriched: Option<EventHandler<OrderEnrichedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_enriched = hooks.on_order_enriched.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_enriched }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_enriched {
            result.order_enriched_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_enriched {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_enriched: Option<Handler<OrderEnrichedEvent>>,
}

impl EventHooks {
    pub fn on_order_enriched<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderEnrichedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_enriched = Some(Arc::new(f));
        self
    }
}
