use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use orderflow_domain::order::OrderStatus;
use orderflow_gateway::domain::repository::{IdempotencyStore, OrdersPort, StatusReadCache};
use orderflow_gateway::domain::types::{IdemState, IdempotencyRecord, OrderSummary};
use orderflow_gateway::error::GatewayError;

// ── MockIdemStore ────────────────────────────────────────────────────────────

/// KV double tracking records, held locks, and every unlock call.
#[derive(Default)]
pub struct MockIdemStore {
    pub records: Arc<Mutex<HashMap<String, IdempotencyRecord>>>,
    pub locked: Mutex<HashSet<String>>,
    pub unlocks: Arc<Mutex<Vec<String>>>,
    /// Simulate a KV outage on lock acquisition.
    pub fail_lock: bool,
    /// Simulate another replica holding the lock.
    pub lock_held_elsewhere: bool,
}

impl MockIdemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(key: &str, record: IdempotencyRecord) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap()
            .insert(key.to_owned(), record);
        store
    }

    pub fn record(&self, key: &str) -> Option<IdempotencyRecord> {
        self.records.lock().unwrap().get(key).cloned()
    }
}

impl IdempotencyStore for MockIdemStore {
    async fn load(&self, key: &str) -> Result<Option<IdempotencyRecord>, GatewayError> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    async fn try_lock(&self, key: &str) -> Result<bool, GatewayError> {
        if self.fail_lock {
            return Err(GatewayError::KvUnavailable);
        }
        if self.lock_held_elsewhere {
            return Ok(false);
        }
        Ok(self.locked.lock().unwrap().insert(key.to_owned()))
    }

    async fn unlock(&self, key: &str) {
        self.locked.lock().unwrap().remove(key);
        self.unlocks.lock().unwrap().push(key.to_owned());
    }

    async fn mark_in_progress(&self, key: &str, payload_hash: &str) -> Result<(), GatewayError> {
        self.records.lock().unwrap().insert(
            key.to_owned(),
            IdempotencyRecord {
                state: IdemState::InProgress,
                payload_hash: payload_hash.to_owned(),
                resp: None,
            },
        );
        Ok(())
    }

    async fn store_done(
        &self,
        key: &str,
        payload_hash: &str,
        resp_json: &str,
    ) -> Result<(), GatewayError> {
        self.records.lock().unwrap().insert(
            key.to_owned(),
            IdempotencyRecord {
                state: IdemState::Done,
                payload_hash: payload_hash.to_owned(),
                resp: Some(resp_json.to_owned()),
            },
        );
        Ok(())
    }

    async fn store_error(
        &self,
        key: &str,
        payload_hash: &str,
        _error: &str,
    ) -> Result<(), GatewayError> {
        self.records.lock().unwrap().insert(
            key.to_owned(),
            IdempotencyRecord {
                state: IdemState::Error,
                payload_hash: payload_hash.to_owned(),
                resp: None,
            },
        );
        Ok(())
    }
}

// ── MockOrdersPort ───────────────────────────────────────────────────────────

/// Orders double: counts create calls and can be scripted to fail.
#[derive(Default)]
pub struct MockOrdersPort {
    pub create_calls: Arc<Mutex<u32>>,
    pub fail_create: bool,
    pub orders: HashMap<String, OrderSummary>,
}

impl MockOrdersPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }
}

pub fn test_summary(order_id: &str, status: OrderStatus) -> OrderSummary {
    OrderSummary {
        order_id: order_id.to_owned(),
        status,
        currency: "RUB".to_owned(),
        total_amount: 199.01,
        created_at: "2025-06-01T12:00:00+00:00".to_owned(),
    }
}

impl OrdersPort for MockOrdersPort {
    async fn create_order(
        &self,
        _user_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<OrderSummary, GatewayError> {
        *self.create_calls.lock().unwrap() += 1;
        if self.fail_create {
            return Err(GatewayError::OrdersUnavailable("orders down".to_owned()));
        }
        Ok(OrderSummary {
            order_id: "11111111-1111-1111-1111-111111111111".to_owned(),
            status: OrderStatus::New,
            currency: currency.to_owned(),
            total_amount: amount_cents as f64 / 100.0,
            created_at: "2025-06-01T12:00:00+00:00".to_owned(),
        })
    }

    async fn get_order(&self, order_id: &str) -> Result<OrderSummary, GatewayError> {
        self.orders
            .get(order_id)
            .cloned()
            .ok_or(GatewayError::OrderNotFound)
    }
}

// ── MockStatusCache ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStatusCache {
    pub entries: Arc<Mutex<HashMap<String, OrderStatus>>>,
}

impl MockStatusCache {
    pub fn with_entry(order_id: &str, status: OrderStatus) -> Self {
        let cache = Self::default();
        cache
            .entries
            .lock()
            .unwrap()
            .insert(order_id.to_owned(), status);
        cache
    }
}

impl StatusReadCache for MockStatusCache {
    async fn get_status(&self, order_id: &str) -> Result<Option<OrderStatus>, GatewayError> {
        Ok(self.entries.lock().unwrap().get(order_id).copied())
    }

    async fn set_status(&self, order_id: &str, status: OrderStatus) -> Result<(), GatewayError> {
        self.entries
            .lock()
            .unwrap()
            .insert(order_id.to_owned(), status);
        Ok(())
    }
}
