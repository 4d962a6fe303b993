use tracing::warn;

use orderflow_domain::order::OrderStatus;

use crate::domain::repository::{OrdersPort, StatusReadCache};
use crate::error::GatewayError;

pub struct GetOrderStatusUseCase<C: StatusReadCache, O: OrdersPort> {
    pub cache: C,
    pub orders: O,
}

impl<C: StatusReadCache, O: OrdersPort> GetOrderStatusUseCase<C, O> {
    /// Status lookup: KV cache first (kept warm by the orders consumer),
    /// falling back to the orders service and backfilling the cache.
    pub async fn execute(&self, order_id: &str) -> Result<OrderStatus, GatewayError> {
        if order_id.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "order_id is required".to_owned(),
            ));
        }

        match self.cache.get_status(order_id).await {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => warn!(order_id, error = %e, "status cache read failed"),
        }

        let summary = self.orders.get_order(order_id).await?;
        if let Err(e) = self.cache.set_status(order_id, summary.status).await {
            warn!(order_id, error = %e, "status cache backfill failed");
        }
        Ok(summary.status)
    }
}
