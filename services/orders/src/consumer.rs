use tracing::warn;

use orderflow_bus::{InboundRecord, RecordProcessor};
use orderflow_domain::event::{
    EVENT_PAYMENT_CONFIRMED, EVENT_PAYMENT_FAILED, EventKind, PaymentEvent,
};

use crate::domain::repository::{OrderRepository, StatusCache};
use crate::usecase::apply_payment::ApplyPaymentUseCase;

/// Processor for freshly recorded `payments.events` records. Dispatches on
/// the `event` discriminator; anything unrecognized is acknowledged as a
/// no-op for forward compatibility.
pub struct PaymentsEventsProcessor<R: OrderRepository, C: StatusCache> {
    pub apply: ApplyPaymentUseCase<R, C>,
}

impl<R: OrderRepository, C: StatusCache> RecordProcessor for PaymentsEventsProcessor<R, C> {
    async fn process(&self, record: &InboundRecord) -> anyhow::Result<()> {
        let Ok(kind) = serde_json::from_slice::<EventKind>(&record.payload) else {
            return Ok(());
        };

        match kind.event.as_str() {
            EVENT_PAYMENT_CONFIRMED | EVENT_PAYMENT_FAILED => {
                let event: PaymentEvent = match serde_json::from_slice(&record.payload) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "bad payment event payload");
                        return Ok(());
                    }
                };
                self.apply.execute(&event).await.map_err(anyhow::Error::from)
            }
            _ => Ok(()),
        }
    }
}
