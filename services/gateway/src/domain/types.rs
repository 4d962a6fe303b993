use serde::{Deserialize, Serialize};

use orderflow_domain::order::OrderStatus;

/// Order data returned to checkout clients. The serialized form is what the
/// idempotency layer caches, so a replay decodes to the identical response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub status: OrderStatus,
    pub currency: String,
    pub total_amount: f64,
    pub created_at: String,
}

/// Idempotency record state machine, stored as a Redis hash per client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdemState {
    InProgress,
    Done,
    Error,
}

impl IdemState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Unknown states behave like `Error`: the fast path falls through and
    /// the request retries through the locked section.
    pub fn parse(s: &str) -> Self {
        match s {
            "in_progress" => Self::InProgress,
            "done" => Self::Done,
            _ => Self::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdempotencyRecord {
    pub state: IdemState,
    pub payload_hash: String,
    /// Serialized `OrderSummary`, populated only in `Done`.
    pub resp: Option<String>,
}

/// Lock key TTL protecting the critical section.
pub const LOCK_TTL_SECS: u64 = 15;

/// Record TTL while the first attempt is running.
pub const RUN_TTL_SECS: u64 = 60;

/// Record TTL after a successful response is stored.
pub const DONE_TTL_SECS: u64 = 60 * 60;

/// Record TTL after a failed attempt.
pub const ERROR_TTL_SECS: u64 = 30;
