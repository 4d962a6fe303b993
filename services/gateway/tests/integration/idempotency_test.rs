use orderflow_domain::order::OrderStatus;
use orderflow_gateway::domain::types::{IdemState, IdempotencyRecord};
use orderflow_gateway::error::GatewayError;
use orderflow_gateway::usecase::create_order::{
    CreateCheckoutInput, CreateCheckoutUseCase, payload_hash,
};

use crate::helpers::{MockIdemStore, MockOrdersPort, test_summary};

const KEY: &str = "idem:checkout:create:K1";

fn input(key: Option<&str>) -> CreateCheckoutInput {
    CreateCheckoutInput {
        user_id: "u1".to_owned(),
        amount_cents: 19901,
        currency: "RUB".to_owned(),
        idempotency_key: key.map(str::to_owned),
    }
}

#[tokio::test]
async fn no_key_bypasses_idempotency_store() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::new(),
        orders: MockOrdersPort::new(),
    };
    let summary = usecase.execute(input(None)).await.unwrap();

    assert_eq!(summary.status, OrderStatus::New);
    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 1);
    assert!(usecase.store.records.lock().unwrap().is_empty());
    assert!(usecase.store.unlocks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fresh_key_creates_order_and_stores_done() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::new(),
        orders: MockOrdersPort::new(),
    };
    let summary = usecase.execute(input(Some("K1"))).await.unwrap();

    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 1);
    let record = usecase.store.record(KEY).unwrap();
    assert_eq!(record.state, IdemState::Done);
    assert_eq!(record.payload_hash, payload_hash("u1", 19901, "RUB"));
    let cached: orderflow_gateway::domain::types::OrderSummary =
        serde_json::from_str(record.resp.as_deref().unwrap()).unwrap();
    assert_eq!(cached, summary);
    // Lock released on the success path.
    assert_eq!(usecase.store.unlocks.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn done_record_replays_without_calling_orders() {
    let stored = test_summary("22222222-2222-2222-2222-222222222222", OrderStatus::New);
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::with_record(
            KEY,
            IdempotencyRecord {
                state: IdemState::Done,
                payload_hash: payload_hash("u1", 19901, "RUB"),
                resp: Some(serde_json::to_string(&stored).unwrap()),
            },
        ),
        orders: MockOrdersPort::new(),
    };

    let first = usecase.execute(input(Some("K1"))).await.unwrap();
    let second = usecase.execute(input(Some("K1"))).await.unwrap();

    assert_eq!(first, stored);
    assert_eq!(first, second);
    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn key_reuse_with_different_payload_conflicts() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::with_record(
            KEY,
            IdempotencyRecord {
                state: IdemState::Done,
                payload_hash: payload_hash("u1", 100, "RUB"),
                resp: None,
            },
        ),
        orders: MockOrdersPort::new(),
    };

    // Same key, different amount.
    let result = usecase.execute(input(Some("K1"))).await;
    assert!(matches!(result, Err(GatewayError::KeyConflict)));
    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn in_progress_record_aborts() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::with_record(
            KEY,
            IdempotencyRecord {
                state: IdemState::InProgress,
                payload_hash: payload_hash("u1", 19901, "RUB"),
                resp: None,
            },
        ),
        orders: MockOrdersPort::new(),
    };

    let result = usecase.execute(input(Some("K1"))).await;
    assert!(matches!(result, Err(GatewayError::InProgress)));
    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn lock_contention_aborts() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore {
            lock_held_elsewhere: true,
            ..MockIdemStore::new()
        },
        orders: MockOrdersPort::new(),
    };

    let result = usecase.execute(input(Some("K1"))).await;
    assert!(matches!(result, Err(GatewayError::InProgress)));
    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn kv_outage_surfaces_resource_exhaustion() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore {
            fail_lock: true,
            ..MockIdemStore::new()
        },
        orders: MockOrdersPort::new(),
    };

    let result = usecase.execute(input(Some("K1"))).await;
    assert!(matches!(result, Err(GatewayError::KvUnavailable)));
    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn orders_failure_stores_error_and_releases_lock() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::new(),
        orders: MockOrdersPort::failing(),
    };

    let result = usecase.execute(input(Some("K1"))).await;
    assert!(matches!(result, Err(GatewayError::OrdersUnavailable(_))));

    let record = usecase.store.record(KEY).unwrap();
    assert_eq!(record.state, IdemState::Error);
    assert_eq!(usecase.store.unlocks.lock().unwrap().len(), 1);
    assert!(usecase.store.locked.lock().unwrap().is_empty());
}

#[tokio::test]
async fn error_record_retries_through_the_lock() {
    // A previous attempt failed; same payload retries and succeeds.
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::with_record(
            KEY,
            IdempotencyRecord {
                state: IdemState::Error,
                payload_hash: payload_hash("u1", 19901, "RUB"),
                resp: None,
            },
        ),
        orders: MockOrdersPort::new(),
    };

    let summary = usecase.execute(input(Some("K1"))).await.unwrap();
    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 1);
    assert_eq!(usecase.store.record(KEY).unwrap().state, IdemState::Done);
    assert_eq!(summary.total_amount, 199.01);
}

#[tokio::test]
async fn invalid_arguments_fail_fast() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::new(),
        orders: MockOrdersPort::new(),
    };

    let mut bad_user = input(Some("K1"));
    bad_user.user_id = String::new();
    assert!(matches!(
        usecase.execute(bad_user).await,
        Err(GatewayError::InvalidArgument(_))
    ));

    let mut bad_amount = input(Some("K1"));
    bad_amount.amount_cents = 0;
    assert!(matches!(
        usecase.execute(bad_amount).await,
        Err(GatewayError::InvalidArgument(_))
    ));

    assert_eq!(*usecase.orders.create_calls.lock().unwrap(), 0);
    assert!(usecase.store.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_key_is_treated_as_absent() {
    let usecase = CreateCheckoutUseCase {
        store: MockIdemStore::new(),
        orders: MockOrdersPort::new(),
    };
    usecase.execute(input(Some("   "))).await.unwrap();
    assert!(usecase.store.records.lock().unwrap().is_empty());
}
