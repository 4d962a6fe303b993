use sea_orm::entity::prelude::*;

/// Outgoing event row, written in the same transaction as the order change.
/// Visible to the relay only while `published_at IS NULL` and `available_at`
/// has passed (or is NULL).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders_outbox")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub agg_type: String,
    pub agg_id: Uuid,
    pub topic: String,
    pub key: Vec<u8>,
    pub headers: Json,
    pub payload: Json,
    pub retries: i32,
    pub available_at: Option<chrono::DateTime<chrono::Utc>>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
