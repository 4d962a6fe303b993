use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use orderflow_bus::{BusProducer, OutboundRecord};
use orderflow_core::backoff::backoff_ms;

use crate::store::{OutboxClaim, OutboxStore};

/// Backoff ceiling: a row never waits more than 5 minutes between attempts.
pub const BACKOFF_CAP_MS: u64 = 5 * 60 * 1_000;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub table: String,
    pub batch_size: u64,
    pub poll_interval: Duration,
    pub produce_timeout: Duration,
    pub backoff_base_ms: u64,
}

impl WorkerConfig {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            batch_size: 100,
            poll_interval: Duration::from_secs(1),
            produce_timeout: Duration::from_secs(3),
            backoff_base_ms: 500,
        }
    }
}

/// Drains one outbox table: claim a batch under row locks, publish, mark
/// each row published or schedule its retry, commit — at-least-once.
pub struct RelayWorker<S: OutboxStore, P: BusProducer> {
    pub store: S,
    pub producer: Arc<P>,
    pub cfg: WorkerConfig,
}

impl<S: OutboxStore, P: BusProducer> RelayWorker<S, P> {
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            table = %self.cfg.table,
            batch_size = self.cfg.batch_size,
            poll_interval_ms = self.cfg.poll_interval.as_millis() as u64,
            "relay worker starting"
        );

        loop {
            if cancel.is_cancelled() {
                info!(table = %self.cfg.table, "relay worker stopped");
                return;
            }

            let drained = match self.process_batch().await {
                Ok(count) => count,
                Err(e) => {
                    error!(table = %self.cfg.table, error = %e, "relay batch failed");
                    0
                }
            };

            // Keep draining a backlog without sleeping; idle-poll otherwise.
            if drained > 0 {
                continue;
            }
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(table = %self.cfg.table, "relay worker stopped");
                    return;
                }
                _ = tokio::time::sleep(self.cfg.poll_interval) => {}
            }
        }
    }

    /// One relay iteration. Crash between produce and commit re-publishes
    /// the same rows later; downstream inboxes absorb the duplicates.
    async fn process_batch(&self) -> anyhow::Result<usize> {
        let claim = self.store.begin().await?;
        let rows = claim.claim(self.cfg.batch_size).await?;
        if rows.is_empty() {
            claim.commit().await?;
            return Ok(0);
        }

        let records: Vec<OutboundRecord> = rows
            .iter()
            .map(|row| OutboundRecord {
                topic: row.topic.clone(),
                key: row.key.clone(),
                headers: row.headers.clone(),
                payload: row.payload.clone(),
            })
            .collect();

        let results = self
            .producer
            .produce(&records, self.cfg.produce_timeout)
            .await;

        for (row, result) in rows.iter().zip(results) {
            match result {
                Ok(()) => claim.mark_published(row.id).await?,
                Err(e) => {
                    let backoff = backoff_ms(row.retries, self.cfg.backoff_base_ms, BACKOFF_CAP_MS);
                    warn!(
                        table = %self.cfg.table,
                        id = row.id,
                        retries = row.retries,
                        backoff_ms = backoff,
                        error = %e,
                        "publish failed, scheduling retry"
                    );
                    claim.mark_failed(row.id, &e.to_string(), backoff).await?;
                }
            }
        }

        claim.commit().await?;
        Ok(rows.len())
    }
}
