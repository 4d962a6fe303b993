use anyhow::Context as _;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, Statement,
    TransactionTrait,
};
use tracing::warn;

/// One claimable outbox row. Identical shape for every outbox table.
#[derive(Debug, Clone)]
pub struct OutboxRow {
    pub id: i64,
    pub topic: String,
    pub key: Vec<u8>,
    pub headers: Vec<(String, String)>,
    pub payload: Vec<u8>,
    pub retries: i32,
}

/// Port over one outbox table. `begin` opens the claim transaction; row
/// locks taken by `claim` are held until `commit`, so two workers never
/// publish the same row from the same claim.
pub trait OutboxStore: Send + Sync {
    type Claim: OutboxClaim;

    async fn begin(&self) -> anyhow::Result<Self::Claim>;
}

pub trait OutboxClaim: Send {
    /// Lock and return up to `limit` publishable rows in id order, skipping
    /// rows locked by other workers.
    async fn claim(&self, limit: u64) -> anyhow::Result<Vec<OutboxRow>>;

    async fn mark_published(&self, id: i64) -> anyhow::Result<()>;

    /// Record a publish failure: bump `retries`, store the error text and
    /// push `available_at` out by `backoff_ms`.
    async fn mark_failed(&self, id: i64, error: &str, backoff_ms: u64) -> anyhow::Result<()>;

    async fn commit(self) -> anyhow::Result<()>;
}

// ── sea-orm implementation ────────────────────────────────────────────────────

/// The table name comes from config, so the queries are raw statements over
/// the shared outbox column set rather than per-table entities.
#[derive(Clone)]
pub struct SeaOrmOutboxStore {
    db: DatabaseConnection,
    table: String,
}

impl SeaOrmOutboxStore {
    pub fn new(db: DatabaseConnection, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }
}

impl OutboxStore for SeaOrmOutboxStore {
    type Claim = SeaOrmOutboxClaim;

    async fn begin(&self) -> anyhow::Result<SeaOrmOutboxClaim> {
        let txn = self.db.begin().await.context("begin outbox claim tx")?;
        Ok(SeaOrmOutboxClaim {
            txn,
            table: self.table.clone(),
        })
    }
}

pub struct SeaOrmOutboxClaim {
    txn: DatabaseTransaction,
    table: String,
}

impl OutboxClaim for SeaOrmOutboxClaim {
    async fn claim(&self, limit: u64) -> anyhow::Result<Vec<OutboxRow>> {
        let sql = format!(
            "SELECT id, topic, key, headers, payload, retries \
             FROM {} \
             WHERE published_at IS NULL \
               AND (available_at IS NULL OR available_at <= now()) \
             ORDER BY id \
             FOR UPDATE SKIP LOCKED \
             LIMIT $1",
            self.table
        );
        let rows = self
            .txn
            .query_all(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [(limit as i64).into()],
            ))
            .await
            .with_context(|| format!("claim {} rows", self.table))?;

        rows.into_iter()
            .map(|row| {
                let headers_json: serde_json::Value = row.try_get("", "headers")?;
                let headers = match serde_json::from_value(headers_json) {
                    Ok(headers) => headers,
                    Err(e) => {
                        warn!(table = %self.table, error = %e, "unreadable outbox headers");
                        Vec::new()
                    }
                };
                let payload: serde_json::Value = row.try_get("", "payload")?;
                Ok(OutboxRow {
                    id: row.try_get("", "id")?,
                    topic: row.try_get("", "topic")?,
                    key: row.try_get("", "key")?,
                    headers,
                    payload: serde_json::to_vec(&payload).context("serialize outbox payload")?,
                    retries: row.try_get("", "retries")?,
                })
            })
            .collect()
    }

    async fn mark_published(&self, id: i64) -> anyhow::Result<()> {
        let sql = format!(
            "UPDATE {} SET published_at = now(), error = NULL WHERE id = $1",
            self.table
        );
        self.txn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [id.into()],
            ))
            .await
            .with_context(|| format!("mark {} row published", self.table))?;
        Ok(())
    }

    async fn mark_failed(&self, id: i64, error: &str, backoff_ms: u64) -> anyhow::Result<()> {
        let sql = format!(
            "UPDATE {} \
             SET retries = retries + 1, \
                 error = $2, \
                 available_at = now() + $3 * interval '1 millisecond' \
             WHERE id = $1",
            self.table
        );
        self.txn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [id.into(), error.into(), (backoff_ms as i64).into()],
            ))
            .await
            .with_context(|| format!("mark {} row failed", self.table))?;
        Ok(())
    }

    async fn commit(self) -> anyhow::Result<()> {
        self.txn.commit().await.context("commit outbox claim tx")?;
        Ok(())
    }
}
