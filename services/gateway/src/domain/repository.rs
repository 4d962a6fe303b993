#![allow(async_fn_in_trait)]

use orderflow_domain::order::OrderStatus;

use crate::domain::types::{IdempotencyRecord, OrderSummary};
use crate::error::GatewayError;

/// Per-key idempotency state machine in shared KV. A local mutex would not
/// survive multi-replica gateway deployments; the critical section is
/// enforced by the store's atomic set-if-absent.
pub trait IdempotencyStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<IdempotencyRecord>, GatewayError>;

    /// Atomic set-if-absent on the companion `:lock` key. `Ok(true)` grants
    /// the critical section.
    async fn try_lock(&self, key: &str) -> Result<bool, GatewayError>;

    /// Best-effort lock release; called on every exit path.
    async fn unlock(&self, key: &str);

    async fn mark_in_progress(&self, key: &str, payload_hash: &str) -> Result<(), GatewayError>;

    async fn store_done(
        &self,
        key: &str,
        payload_hash: &str,
        resp_json: &str,
    ) -> Result<(), GatewayError>;

    async fn store_error(
        &self,
        key: &str,
        payload_hash: &str,
        error: &str,
    ) -> Result<(), GatewayError>;
}

/// Port for the downstream orders service.
pub trait OrdersPort: Send + Sync {
    async fn create_order(
        &self,
        user_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<OrderSummary, GatewayError>;

    async fn get_order(&self, order_id: &str) -> Result<OrderSummary, GatewayError>;
}

/// Read-through cache over the order status keys maintained by the orders
/// service.
pub trait StatusReadCache: Send + Sync {
    async fn get_status(&self, order_id: &str) -> Result<Option<OrderStatus>, GatewayError>;

    async fn set_status(&self, order_id: &str, status: OrderStatus) -> Result<(), GatewayError>;
}
