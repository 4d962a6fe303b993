use tracing::warn;

use orderflow_bus::{InboundRecord, RecordProcessor};
use orderflow_domain::event::{EVENT_ORDER_CREATED, EventKind, OrderCreatedEvent};

use crate::domain::repository::PaymentRepository;
use crate::usecase::process_order::ProcessOrderUseCase;

/// Processor for freshly recorded `orders.events` records. Only
/// `order.created` has side effects; other events are acknowledged as
/// no-ops for forward compatibility.
pub struct OrdersEventsProcessor<R: PaymentRepository> {
    pub process_order: ProcessOrderUseCase<R>,
}

impl<R: PaymentRepository> RecordProcessor for OrdersEventsProcessor<R> {
    async fn process(&self, record: &InboundRecord) -> anyhow::Result<()> {
        let Ok(kind) = serde_json::from_slice::<EventKind>(&record.payload) else {
            warn!("skip non-json payload");
            return Ok(());
        };

        match kind.event.as_str() {
            EVENT_ORDER_CREATED => {
                let event: OrderCreatedEvent = match serde_json::from_slice(&record.payload) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "bad order.created payload");
                        return Ok(());
                    }
                };
                self.process_order
                    .execute(&event)
                    .await
                    .map_err(anyhow::Error::from)
            }
            _ => Ok(()),
        }
    }
}
