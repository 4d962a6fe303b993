use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use orderflow_bus::testing::ScriptedConsumer;
use orderflow_bus::{InboundRecord, InboxStore, run_consumer};
use orderflow_domain::event::{OrderCreatedEvent, PaymentEvent};
use orderflow_domain::payment::{Payment, PaymentStatus};
use orderflow_payments::consumer::OrdersEventsProcessor;
use orderflow_payments::domain::repository::PaymentRepository;
use orderflow_payments::error::PaymentsServiceError;
use orderflow_payments::usecase::process_order::ProcessOrderUseCase;

#[derive(Default, Clone)]
struct MemoryPaymentRepo {
    pairs: Arc<Mutex<Vec<(Payment, PaymentEvent)>>>,
}

impl PaymentRepository for MemoryPaymentRepo {
    async fn create_with_outbox(
        &self,
        payment: &Payment,
        event: &PaymentEvent,
    ) -> Result<(), PaymentsServiceError> {
        self.pairs
            .lock()
            .unwrap()
            .push((payment.clone(), event.clone()));
        Ok(())
    }
}

#[derive(Default)]
struct MemoryInbox {
    seen: Mutex<Vec<(String, i32, i64)>>,
    processed: Mutex<Vec<i64>>,
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

    async fn mark_processed(&self, id: i64) -> anyhow::Result<()> {
        self.processed.lock().unwrap().push(id);
        Ok(())
    }
}

fn order_record(amount_cents: i64, offset: i64) -> InboundRecord {
    let event = OrderCreatedEvent::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        amount_cents,
        "RUB",
        Utc::now(),
    );
    InboundRecord {
        topic: "orders.events".to_owned(),
        partition: 0,
        offset,
        key: event.order_id.as_bytes().to_vec(),
        headers: vec![
            ("event-type".to_owned(), "order.created".to_owned()),
            ("source".to_owned(), "orders-grpc".to_owned()),
        ],
        payload: serde_json::to_vec(&event).unwrap(),
    }
}

#[tokio::test]
async fn order_created_yields_confirmed_payment_and_event() {
    let repo = MemoryPaymentRepo::default();
    let pairs = repo.pairs.clone();
    let consumer = ScriptedConsumer::new(vec![order_record(19901, 1)]);
    let inbox = MemoryInbox::default();
    let processor = OrdersEventsProcessor {
        process_order: ProcessOrderUseCase { repo },
    };

    run_consumer(&consumer, &inbox, &processor, CancellationToken::new())
        .await
        .unwrap();

    let pairs = pairs.lock().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0.status, PaymentStatus::Confirmed);
    assert_eq!(pairs[0].1.event, "payment.confirmed");
    assert_eq!(inbox.processed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn multiple_of_five_yields_failed_payment() {
    let repo = MemoryPaymentRepo::default();
    let pairs = repo.pairs.clone();
    let consumer = ScriptedConsumer::new(vec![order_record(1000, 1)]);
    let inbox = MemoryInbox::default();
    let processor = OrdersEventsProcessor {
        process_order: ProcessOrderUseCase { repo },
    };

    run_consumer(&consumer, &inbox, &processor, CancellationToken::new())
        .await
        .unwrap();

    let pairs = pairs.lock().unwrap();
    assert_eq!(pairs[0].0.status, PaymentStatus::Failed);
    assert_eq!(pairs[0].0.reason.as_deref(), Some("insufficient_funds"));
    assert_eq!(pairs[0].1.event, "payment.failed");
}

#[tokio::test]
async fn duplicate_order_created_yields_single_payment() {
    let repo = MemoryPaymentRepo::default();
    let pairs = repo.pairs.clone();
    let record = order_record(777, 5);
    let consumer = ScriptedConsumer::new(vec![record.clone(), record]);
    let inbox = MemoryInbox::default();
    let processor = OrdersEventsProcessor {
        process_order: ProcessOrderUseCase { repo },
    };

    run_consumer(&consumer, &inbox, &processor, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(pairs.lock().unwrap().len(), 1);
}
