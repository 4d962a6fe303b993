#![allow(async_fn_in_trait)]

use orderflow_domain::event::PaymentEvent;
use orderflow_domain::payment::Payment;

use crate::error::PaymentsServiceError;

/// Repository for payments and their outbox.
pub trait PaymentRepository: Send + Sync {
    /// Insert the payment and its `payment.*` outbox row atomically (same
    /// transaction). Either both rows are present afterwards or neither.
    async fn create_with_outbox(
        &self,
        payment: &Payment,
        event: &PaymentEvent,
    ) -> Result<(), PaymentsServiceError>;
}
