use chrono::Utc;
use uuid::Uuid;

use orderflow_domain::event::{EVENT_ORDER_CREATED, OrderCreatedEvent};
use orderflow_domain::order::{Order, OrderStatus, normalize_currency};

use crate::domain::repository::OrderRepository;
use crate::error::OrdersServiceError;

pub struct CreateOrderInput {
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
}

pub struct CreateOrderUseCase<R: OrderRepository> {
    pub repo: R,
}

impl<R: OrderRepository> CreateOrderUseCase<R> {
    /// Persist the order and its `order.created` outbox row in one
    /// transaction, so the pair commits atomically or not at all.
    pub async fn execute(&self, input: CreateOrderInput) -> Result<Order, OrdersServiceError> {
        if input.amount_cents <= 0 {
            return Err(OrdersServiceError::InvalidArgument(
                "amount_cents must be > 0".to_owned(),
            ));
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            status: OrderStatus::New,
            total_amount: input.amount_cents as f64 / 100.0,
            currency: normalize_currency(&input.currency),
            created_at: now,
            updated_at: now,
        };

        let event = OrderCreatedEvent::new(
            order.id,
            order.user_id,
            input.amount_cents,
            &order.currency,
            now,
        );
        let headers = [
            ("event-type".to_owned(), EVENT_ORDER_CREATED.to_owned()),
            ("source".to_owned(), "orders-grpc".to_owned()),
        ];

        self.repo.create_with_outbox(&order, &event, &headers).await?;
        Ok(order)
    }
}
