#![allow(async_fn_in_trait)]

use uuid::Uuid;

use orderflow_domain::event::OrderCreatedEvent;
use orderflow_domain::order::{Order, OrderStatus};

use crate::error::OrdersServiceError;

/// Repository for the order aggregate and its outbox.
pub trait OrderRepository: Send + Sync {
    /// Insert a new order and its `order.created` outbox row atomically
    /// (same transaction).
    async fn create_with_outbox(
        &self,
        order: &Order,
        event: &OrderCreatedEvent,
        headers: &[(String, String)],
    ) -> Result<(), OrdersServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrdersServiceError>;

    /// Conditionally transition an order: `SET status = want WHERE id = ?
    /// AND status <> want`. Returns `true` when a row actually changed,
    /// which is what makes repeated payment events no-ops.
    async fn apply_status(&self, id: Uuid, want: OrderStatus)
    -> Result<bool, OrdersServiceError>;

    async fn current_status(&self, id: Uuid) -> Result<Option<OrderStatus>, OrdersServiceError>;
}

/// Write-through cache for order status lookups (Redis, configurable TTL).
pub trait StatusCache: Send + Sync {
    async fn set_status(&self, order_id: Uuid, status: OrderStatus)
    -> Result<(), OrdersServiceError>;
}
