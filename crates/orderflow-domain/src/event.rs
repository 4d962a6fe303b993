use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payment::PaymentStatus;

pub const TOPIC_ORDERS_EVENTS: &str = "orders.events";
pub const TOPIC_PAYMENTS_EVENTS: &str = "payments.events";

pub const EVENT_ORDER_CREATED: &str = "order.created";
pub const EVENT_PAYMENT_CONFIRMED: &str = "payment.confirmed";
pub const EVENT_PAYMENT_FAILED: &str = "payment.failed";

/// Current wire version for both event families.
pub const EVENT_VERSION: i32 = 1;

/// Envelope peek used to dispatch on the `event` discriminator before
/// committing to a full decode. Unknown events fall through to a no-op.
#[derive(Debug, Deserialize)]
pub struct EventKind {
    pub event: String,
}

/// Published to `orders.events` when an order is created. Written to the
/// orders outbox in the same transaction as the order row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub event: String,
    pub version: i32,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl OrderCreatedEvent {
    pub fn new(
        order_id: Uuid,
        user_id: Uuid,
        amount_cents: i64,
        currency: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event: EVENT_ORDER_CREATED.to_owned(),
            version: EVENT_VERSION,
            order_id,
            user_id,
            amount_cents,
            currency: currency.to_owned(),
            status: "new".to_owned(),
            created_at,
        }
    }
}

/// Published to `payments.events` once the acquiring decision is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub event: String,
    pub version: i32,
    pub payment_id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub processed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PaymentEvent {
    /// Event name is derived from the outcome: `payment.confirmed` or
    /// `payment.failed`.
    pub fn from_outcome(
        payment_id: Uuid,
        order_id: Uuid,
        user_id: Uuid,
        amount_cents: i64,
        currency: &str,
        status: PaymentStatus,
        processed_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Self {
        Self {
            event: format!("payment.{status}"),
            version: EVENT_VERSION,
            payment_id,
            order_id,
            user_id,
            amount_cents,
            currency: currency.to_owned(),
            status: status.as_str().to_owned(),
            processed_at,
            reason,
        }
    }
}
