use chrono::Utc;
use uuid::Uuid;

use orderflow_bus::testing::ScriptedConsumer;
use orderflow_bus::{InboundRecord, InboxStore, run_consumer};
use orderflow_domain::event::PaymentEvent;
use orderflow_domain::order::OrderStatus;
use orderflow_domain::payment::PaymentStatus;
use orderflow_orders::consumer::PaymentsEventsProcessor;
use orderflow_orders::usecase::apply_payment::ApplyPaymentUseCase;
use orderflow_orders::usecase::create_order::{CreateOrderInput, CreateOrderUseCase};
use tokio_util::sync::CancellationToken;

use crate::helpers::{MemoryOrderRepo, MemoryStatusCache};

/// Dedup table double shared between "deliveries".
#[derive(Default)]
struct MemoryInbox {
    seen: std::sync::Mutex<Vec<(String, i32, i64)>>,
}

impl InboxStore for MemoryInbox {
    async fn insert(&self, record: &InboundRecord) -> anyhow::Result<Option<i64>> {
        let coords = (record.topic.clone(), record.partition, record.offset);
        let mut seen = self.seen.lock().unwrap();
        if seen.contains(&coords) {
            return Ok(None);
        }
        seen.push(coords);
        Ok(Some(seen.len() as i64))
    }

    async fn mark_processed(&self, _id: i64) -> anyhow::Result<()> {
        Ok(())
    }
}

fn payment_record(order_id: Uuid, status: PaymentStatus, offset: i64) -> InboundRecord {
    let event = PaymentEvent::from_outcome(
        Uuid::new_v4(),
        order_id,
        Uuid::new_v4(),
        19901,
        "RUB",
        status,
        Utc::now(),
        None,
    );
    InboundRecord {
        topic: "payments.events".to_owned(),
        partition: 0,
        offset,
        key: order_id.as_bytes().to_vec(),
        headers: vec![],
        payload: serde_json::to_vec(&event).unwrap(),
    }
}

#[tokio::test]
async fn created_order_has_exactly_one_outbox_event() {
    let repo = MemoryOrderRepo::new();
    let orders = repo.orders.clone();
    let outbox = repo.outbox.clone();

    let usecase = CreateOrderUseCase { repo };
    let order = usecase
        .execute(CreateOrderInput {
            user_id: Uuid::new_v4(),
            amount_cents: 19901,
            currency: "RUB".to_owned(),
        })
        .await
        .unwrap();

    let orders = orders.lock().unwrap();
    let outbox = outbox.lock().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].order_id, order.id);
    assert_eq!(outbox[0].event, "order.created");
}

#[tokio::test]
async fn payment_confirmed_moves_order_to_paid_end_to_end() {
    let repo = MemoryOrderRepo::new();
    let orders = repo.orders.clone();

    // Seed an order through the real create path.
    let create = CreateOrderUseCase { repo };
    let order = create
        .execute(CreateOrderInput {
            user_id: Uuid::new_v4(),
            amount_cents: 19901,
            currency: "RUB".to_owned(),
        })
        .await
        .unwrap();

    let cache = MemoryStatusCache::default();
    let cache_writes = cache.writes.clone();
    let consumer = ScriptedConsumer::new(vec![payment_record(
        order.id,
        PaymentStatus::Confirmed,
        1,
    )]);
    let inbox = MemoryInbox::default();
    let processor = PaymentsEventsProcessor {
        apply: ApplyPaymentUseCase {
            repo: MemoryOrderRepo {
                orders: orders.clone(),
                outbox: Default::default(),
            },
            cache,
        },
    };

    run_consumer(&consumer, &inbox, &processor, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(orders.lock().unwrap()[0].status, OrderStatus::Paid);
    assert_eq!(
        cache_writes.lock().unwrap().as_slice(),
        &[(order.id, OrderStatus::Paid)]
    );
}

#[tokio::test]
async fn duplicate_delivery_leaves_state_unchanged() {
    let repo = MemoryOrderRepo::new();
    let orders = repo.orders.clone();

    let create = CreateOrderUseCase { repo };
    let order = create
        .execute(CreateOrderInput {
            user_id: Uuid::new_v4(),
            amount_cents: 100,
            currency: "RUB".to_owned(),
        })
        .await
        .unwrap();

    // Same coordinates delivered twice.
    let record = payment_record(order.id, PaymentStatus::Failed, 42);
    let consumer = ScriptedConsumer::new(vec![record.clone(), record]);
    let inbox = MemoryInbox::default();
    let cache = MemoryStatusCache::default();
    let cache_writes = cache.writes.clone();
    let processor = PaymentsEventsProcessor {
        apply: ApplyPaymentUseCase {
            repo: MemoryOrderRepo {
                orders: orders.clone(),
                outbox: Default::default(),
            },
            cache,
        },
    };

    run_consumer(&consumer, &inbox, &processor, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(orders.lock().unwrap()[0].status, OrderStatus::Cancelled);
    // One cache write: the duplicate never reached the processor.
    assert_eq!(cache_writes.lock().unwrap().len(), 1);
}
