use std::sync::{Arc, Mutex};

use uuid::Uuid;

use orderflow_domain::event::OrderCreatedEvent;
use orderflow_domain::order::{Order, OrderStatus};
use orderflow_orders::domain::repository::{OrderRepository, StatusCache};
use orderflow_orders::error::OrdersServiceError;

/// In-memory order store implementing both the aggregate-and-outbox pair and
/// the conditional status transition.
#[derive(Default)]
pub struct MemoryOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
    pub outbox: Arc<Mutex<Vec<OrderCreatedEvent>>>,
}

impl MemoryOrderRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for MemoryOrderRepo {
    async fn create_with_outbox(
        &self,
        order: &Order,
        event: &OrderCreatedEvent,
        _headers: &[(String, String)],
    ) -> Result<(), OrdersServiceError> {
        // Both inserts or neither, like the real transaction.
        self.orders.lock().unwrap().push(order.clone());
        self.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrdersServiceError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn apply_status(
        &self,
        id: Uuid,
        want: OrderStatus,
    ) -> Result<bool, OrdersServiceError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == id && o.status != want) {
            Some(order) => {
                order.status = want;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn current_status(&self, id: Uuid) -> Result<Option<OrderStatus>, OrdersServiceError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.status))
    }
}

/// Records every cache write for post-run inspection.
#[derive(Default)]
pub struct MemoryStatusCache {
    pub writes: Arc<Mutex<Vec<(Uuid, OrderStatus)>>>,
}

impl StatusCache for MemoryStatusCache {
    async fn set_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        self.writes.lock().unwrap().push((order_id, status));
        Ok(())
    }
}
