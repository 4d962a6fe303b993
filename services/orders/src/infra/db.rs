use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use orderflow_bus::{InboundRecord, InboxStore};
use orderflow_domain::event::{OrderCreatedEvent, TOPIC_ORDERS_EVENTS};
use orderflow_domain::order::{Order, OrderStatus};
use orderflow_orders_schema::{orders, orders_inbox, orders_outbox};

use crate::domain::repository::OrderRepository;
use crate::error::OrdersServiceError;

// ── Order repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn create_with_outbox(
        &self,
        order: &Order,
        event: &OrderCreatedEvent,
        headers: &[(String, String)],
    ) -> Result<(), OrdersServiceError> {
        let payload = serde_json::to_value(event).context("serialize order event")?;
        let headers_json = serde_json::to_value(headers).context("serialize outbox headers")?;

        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let order = order.clone();
                Box::pin(async move {
                    insert_order(txn, &order).await?;
                    insert_outbox_row(txn, &order, TOPIC_ORDERS_EVENTS, headers_json, payload)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("create order with outbox")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrdersServiceError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        model.map(order_from_model).transpose()
    }

    async fn apply_status(
        &self,
        id: Uuid,
        want: OrderStatus,
    ) -> Result<bool, OrdersServiceError> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(want.as_str()))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::Status.ne(want.as_str()))
            .exec(&self.db)
            .await
            .context("update order status")?;
        Ok(result.rows_affected > 0)
    }

    async fn current_status(&self, id: Uuid) -> Result<Option<OrderStatus>, OrdersServiceError> {
        Ok(self.find_by_id(id).await?.map(|o| o.status))
    }
}

async fn insert_order(txn: &DatabaseTransaction, order: &Order) -> Result<(), sea_orm::DbErr> {
    orders::ActiveModel {
        id: Set(order.id),
        user_id: Set(order.user_id),
        status: Set(order.status.as_str().to_owned()),
        total_amount: Set(order.total_amount),
        currency: Set(order.currency.clone()),
        created_at: Set(order.created_at),
        updated_at: Set(order.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_row(
    txn: &DatabaseTransaction,
    order: &Order,
    topic: &str,
    headers: serde_json::Value,
    payload: serde_json::Value,
) -> Result<(), sea_orm::DbErr> {
    orders_outbox::ActiveModel {
        agg_type: Set("order".to_owned()),
        agg_id: Set(order.id),
        topic: Set(topic.to_owned()),
        key: Set(order.id.as_bytes().to_vec()),
        headers: Set(headers),
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

fn order_from_model(model: orders::Model) -> Result<Order, OrdersServiceError> {
    let status = OrderStatus::parse(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown order status {:?}", model.status))?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        status,
        total_amount: model.total_amount,
        currency: model.currency,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Inbox store (payments.events dedup) ───────────────────────────────────────

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

        let row = orders_inbox::ActiveModel {
            topic: Set(record.topic.clone()),
            partition: Set(record.partition),
            offset: Set(record.offset),
            key: Set(record.key.clone()),
            payload: Set(payload),
            received_at: Set(Utc::now()),
            processed_at: Set(None),
            ..Default::default()
        };

        let result = orders_inbox::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    orders_inbox::Column::Topic,
                    orders_inbox::Column::Partition,
                    orders_inbox::Column::Offset,
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
            Err(e) => Err(e).context("insert orders_inbox"),
        }
    }

    async fn mark_processed(&self, id: i64) -> anyhow::Result<()> {
        orders_inbox::Entity::update_many()
            .col_expr(orders_inbox::Column::ProcessedAt, Expr::value(Utc::now()))
            .filter(orders_inbox::Column::Id.eq(id))
            .filter(orders_inbox::Column::ProcessedAt.is_null())
            .exec(&self.db)
            .await
            .context("mark orders_inbox processed")?;
        Ok(())
    }
}
