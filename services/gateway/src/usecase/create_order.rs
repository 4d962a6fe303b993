use sha2::{Digest, Sha256};
use tracing::{info, warn};

use orderflow_domain::order::normalize_currency;

use crate::domain::repository::{IdempotencyStore, OrdersPort};
use crate::domain::types::{IdemState, OrderSummary};
use crate::error::GatewayError;

/// Canonical request digest: `SHA256("{user}|{amount}|{currency_upper}")`.
/// Two requests under one idempotency key must hash equal to be treated as
/// retries of each other.
pub fn payload_hash(user_id: &str, amount_cents: i64, currency: &str) -> String {
    let base = format!(
        "{}|{}|{}",
        user_id.trim(),
        amount_cents,
        currency.trim().to_uppercase()
    );
    hex::encode(Sha256::digest(base.as_bytes()))
}

fn record_key(client_key: &str) -> String {
    format!("idem:checkout:create:{client_key}")
}

pub struct CreateCheckoutInput {
    pub user_id: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Client-supplied idempotency key from request metadata, if any.
    pub idempotency_key: Option<String>,
}

pub struct CreateCheckoutUseCase<S: IdempotencyStore, O: OrdersPort> {
    pub store: S,
    pub orders: O,
}

impl<S: IdempotencyStore, O: OrdersPort> CreateCheckoutUseCase<S, O> {
    pub async fn execute(&self, input: CreateCheckoutInput) -> Result<OrderSummary, GatewayError> {
        if input.user_id.is_empty() || input.amount_cents <= 0 {
            return Err(GatewayError::InvalidArgument(
                "user_id and positive amount_cents are required".to_owned(),
            ));
        }
        let currency = normalize_currency(&input.currency);

        // No key: plain pass-through, no idempotency machinery.
        let Some(client_key) = input
            .idempotency_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        else {
            return self
                .orders
                .create_order(&input.user_id, input.amount_cents, &currency)
                .await;
        };

        let key = record_key(client_key);
        let hash = payload_hash(&input.user_id, input.amount_cents, &currency);

        // Fast path: an existing record settles the request without touching
        // the lock. A load failure is tolerated; only the lock decides.
        match self.store.load(&key).await {
            Ok(Some(record)) => {
                if !record.payload_hash.is_empty() && record.payload_hash != hash {
                    return Err(GatewayError::KeyConflict);
                }
                match record.state {
                    IdemState::Done => {
                        if let Some(resp) = record.resp.as_deref() {
                            if let Ok(summary) = serde_json::from_str::<OrderSummary>(resp) {
                                info!(key = %client_key, "idempotent replay");
                                return Ok(summary);
                            }
                        }
                        // Unreadable stored response: redo through the lock.
                    }
                    IdemState::InProgress => return Err(GatewayError::InProgress),
                    IdemState::Error => {}
                }
            }
            Ok(None) => {}
            Err(e) => warn!(key = %client_key, error = %e, "idempotency record load failed"),
        }

        if !self.store.try_lock(&key).await? {
            return Err(GatewayError::InProgress);
        }
        let result = self
            .run_locked(&key, &hash, &input.user_id, input.amount_cents, &currency)
            .await;
        self.store.unlock(&key).await;
        result
    }

    async fn run_locked(
        &self,
        key: &str,
        hash: &str,
        user_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<OrderSummary, GatewayError> {
        if let Err(e) = self.store.mark_in_progress(key, hash).await {
            warn!(error = %e, "mark in_progress failed");
        }

        match self.orders.create_order(user_id, amount_cents, currency).await {
            Ok(summary) => {
                match serde_json::to_string(&summary) {
                    Ok(resp_json) => {
                        if let Err(e) = self.store.store_done(key, hash, &resp_json).await {
                            warn!(error = %e, "store done record failed");
                        }
                    }
                    Err(e) => warn!(error = %e, "serialize response for replay failed"),
                }
                Ok(summary)
            }
            Err(e) => {
                if let Err(se) = self.store.store_error(key, hash, &e.to_string()).await {
                    warn!(error = %se, "store error record failed");
                }
                Err(e)
            }
        }
    }
}
