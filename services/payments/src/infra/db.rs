use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, TransactionTrait,
};

use orderflow_bus::{InboundRecord, InboxStore};
use orderflow_domain::event::{PaymentEvent, TOPIC_PAYMENTS_EVENTS};
use orderflow_domain::payment::Payment;
use orderflow_payments_schema::{payments, payments_inbox, payments_outbox};

use crate::domain::repository::PaymentRepository;
use crate::error::PaymentsServiceError;

// ── Payment repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPaymentRepository {
    pub db: DatabaseConnection,
}

impl PaymentRepository for DbPaymentRepository {
    async fn create_with_outbox(
        &self,
        payment: &Payment,
        event: &PaymentEvent,
    ) -> Result<(), PaymentsServiceError> {
        let payload = serde_json::to_value(event).context("serialize payment event")?;

        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let payment = payment.clone();
                Box::pin(async move {
                    insert_payment(txn, &payment).await?;
                    insert_outbox_row(txn, &payment, payload).await?;
                    Ok(())
                })
            })
            .await
            .context("create payment with outbox")?;
        Ok(())
    }
}

async fn insert_payment(
    txn: &DatabaseTransaction,
    payment: &Payment,
) -> Result<(), sea_orm::DbErr> {
    payments::ActiveModel {
        id: Set(payment.id),
        order_id: Set(payment.order_id),
        user_id: Set(payment.user_id),
        amount_cents: Set(payment.amount_cents),
        currency: Set(payment.currency.clone()),
        status: Set(payment.status.as_str().to_owned()),
        provider: Set(payment.provider.clone()),
        reason: Set(payment.reason.clone()),
        created_at: Set(payment.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_row(
    txn: &DatabaseTransaction,
    payment: &Payment,
    payload: serde_json::Value,
) -> Result<(), sea_orm::DbErr> {
    payments_outbox::ActiveModel {
        agg_type: Set("payment".to_owned()),
        agg_id: Set(payment.id),
        topic: Set(TOPIC_PAYMENTS_EVENTS.to_owned()),
        // Keyed by order_id so downstream consumers observe per-order
        // ordering on the same partition as the original event.
        key: Set(payment.order_id.as_bytes().to_vec()),
        headers: Set(serde_json::Value::Array(vec![])),
        payload: Set(payload),
        retries: Set(0),
        available_at: Set(None),
        published_at: Set(None),
        error: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(())
}

// ── Inbox store (orders.events dedup) ─────────────────────────────────────────

#[derive(Clone)]
pub struct DbInboxStore {
    pub db: DatabaseConnection,
}

impl InboxStore for DbInboxStore {
    async fn insert(&self, record: &InboundRecord) -> anyhow::Result<Option<i64>> {
        // Non-JSON payloads are still recorded (dedup must hold) as a JSON
        // string; the processor will no-op them.
        let payload = match serde_json::from_slice::<serde_json::Value>(&record.payload) {
            Ok(value) => value,
            Err(_) => serde_json::Value::String(
                String::from_utf8_lossy(&record.payload).into_owned(),
            ),
        };

        let row = payments_inbox::ActiveModel {
            topic: Set(record.topic.clone()),
            partition: Set(record.partition),
            offset: Set(record.offset),
            key: Set(record.key.clone()),
            payload: Set(payload),
            received_at: Set(Utc::now()),
            processed_at: Set(None),
            ..Default::default()
        };

        let result = payments_inbox::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    payments_inbox::Column::Topic,
                    payments_inbox::Column::Partition,
                    payments_inbox::Column::Offset,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await;

        match result {
            Ok(model) => Ok(Some(model.id)),
            // Conflict target hit: the record was already recorded.
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(e).context("insert payments_inbox"),
        }
    }

    async fn mark_processed(&self, id: i64) -> anyhow::Result<()> {
        payments_inbox::Entity::update_many()
            .col_expr(payments_inbox::Column::ProcessedAt, Expr::value(Utc::now()))
            .filter(payments_inbox::Column::Id.eq(id))
            .filter(payments_inbox::Column::ProcessedAt.is_null())
            .exec(&self.db)
            .await
            .context("mark payments_inbox processed")?;
        Ok(())
    }
}
