use tracing::{info, warn};

use orderflow_domain::event::{EVENT_PAYMENT_CONFIRMED, EVENT_PAYMENT_FAILED, PaymentEvent};
use orderflow_domain::order::OrderStatus;

use crate::domain::repository::{OrderRepository, StatusCache};
use crate::error::OrdersServiceError;

pub struct ApplyPaymentUseCase<R: OrderRepository, C: StatusCache> {
    pub repo: R,
    pub cache: C,
}

impl<R: OrderRepository, C: StatusCache> ApplyPaymentUseCase<R, C> {
    /// Apply a terminal payment outcome to the order.
    ///
    /// The conditional `status <> want` write makes re-delivered events
    /// no-ops; on a no-op the current status is re-read so the cache stays
    /// warm. Cache failures never fail the event.
    pub async fn execute(&self, event: &PaymentEvent) -> Result<(), OrdersServiceError> {
        let want = match event.event.as_str() {
            EVENT_PAYMENT_CONFIRMED => OrderStatus::Paid,
            EVENT_PAYMENT_FAILED => OrderStatus::Cancelled,
            _ => return Ok(()),
        };

        let changed = self.repo.apply_status(event.order_id, want).await?;
        if changed {
            info!(order_id = %event.order_id, to = %want, "order status updated");
            self.cache_status(event, want).await;
            return Ok(());
        }

        // Nothing changed. Re-read the actual status and cache that, so a
        // late duplicate still refreshes the cache with the truth.
        match self.repo.current_status(event.order_id).await {
            Ok(Some(current)) => {
                info!(order_id = %event.order_id, kept = %current, "payment event applied (noop)");
                self.cache_status(event, current).await;
            }
            Ok(None) => {
                warn!(order_id = %event.order_id, "payment event for unknown order");
            }
            Err(e) => {
                warn!(order_id = %event.order_id, error = %e, "could not read status after noop");
            }
        }
        Ok(())
    }

    async fn cache_status(&self, event: &PaymentEvent, status: OrderStatus) {
        if let Err(e) = self.cache.set_status(event.order_id, status).await {
            warn!(order_id = %event.order_id, error = %e, "status cache write failed");
        }
    }
}
