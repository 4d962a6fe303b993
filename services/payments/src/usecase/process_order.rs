use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use orderflow_domain::event::{OrderCreatedEvent, PaymentEvent};
use orderflow_domain::payment::{Payment, PaymentStatus};

use crate::domain::repository::PaymentRepository;
use crate::error::PaymentsServiceError;

/// Acquiring provider name recorded on every payment row.
const PROVIDER: &str = "mockpay";

/// Stand-in acquiring policy. Deterministic from the payload so that a
/// re-delivered `order.created` converges on the same outcome: amounts that
/// are a multiple of 5 fail with `insufficient_funds`, everything else is
/// confirmed.
pub fn decide(amount_cents: i64) -> (PaymentStatus, Option<&'static str>) {
    if amount_cents % 5 == 0 {
        (PaymentStatus::Failed, Some("insufficient_funds"))
    } else {
        (PaymentStatus::Confirmed, None)
    }
}

pub struct ProcessOrderUseCase<R: PaymentRepository> {
    pub repo: R,
}

impl<R: PaymentRepository> ProcessOrderUseCase<R> {
    /// Decide the outcome for a new order and persist the payment together
    /// with its outgoing event in one transaction.
    pub async fn execute(&self, order: &OrderCreatedEvent) -> Result<(), PaymentsServiceError> {
        let (status, reason) = decide(order.amount_cents);
        let now = Utc::now();

        let payment = Payment {
            id: Uuid::new_v4(),
            order_id: order.order_id,
            user_id: order.user_id,
            amount_cents: order.amount_cents,
            currency: order.currency.clone(),
            status,
            provider: PROVIDER.to_owned(),
            reason: reason.map(str::to_owned),
            created_at: now,
        };

        let event = PaymentEvent::from_outcome(
            payment.id,
            order.order_id,
            order.user_id,
            order.amount_cents,
            &order.currency,
            status,
            now,
            payment.reason.clone(),
        );

        self.repo.create_with_outbox(&payment, &event).await?;

        info!(
            order_id = %order.order_id,
            payment_id = %payment.id,
            status = %status,
            "payment processed"
        );
        Ok(())
    }
}
