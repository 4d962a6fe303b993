use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::BusConsumer;
use crate::error::BusError;
use crate::record::InboundRecord;

/// Port backing the consumer's dedup table.
pub trait InboxStore: Send + Sync {
    /// Insert the record keyed by `(topic, partition, offset)`.
    /// Returns the new row id, or `None` when the coordinates were already
    /// recorded (bus re-delivery).
    async fn insert(&self, record: &InboundRecord) -> anyhow::Result<Option<i64>>;

    /// Stamp `processed_at` on a previously inserted row.
    async fn mark_processed(&self, id: i64) -> anyhow::Result<()>;
}

/// Port for the service-specific side effects of a freshly recorded event.
pub trait RecordProcessor: Send + Sync {
    async fn process(&self, record: &InboundRecord) -> anyhow::Result<()>;
}

/// Consume records until cancellation, running each through the inbox dedup
/// contract:
///
/// 1. insert into the inbox — duplicate coordinates are acknowledged and
///    skipped without re-running side effects;
/// 2. invoke the processor — a failing processor leaves the row with
///    `processed_at` NULL and is not retried on re-delivery;
/// 3. stamp `processed_at` on success.
pub async fn run_consumer<C, I, P>(
    consumer: &C,
    inbox: &I,
    processor: &P,
    cancel: CancellationToken,
) -> Result<(), BusError>
where
    C: BusConsumer,
    I: InboxStore,
    P: RecordProcessor,
{
    loop {
        let record = tokio::select! {
            _ = cancel.cancelled() => {
                info!("consumer stopping");
                return Ok(());
            }
            next = consumer.next() => match next {
                Ok(record) => record,
                Err(BusError::Closed) => {
                    info!("consumer source closed");
                    return Ok(());
                }
                Err(e) => {
                    warn!(error = %e, "fetch error");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            },
        };

        let inbox_id = match inbox.insert(&record).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                debug!(
                    topic = %record.topic,
                    partition = record.partition,
                    offset = record.offset,
                    "duplicate record, skipping"
                );
                continue;
            }
            Err(e) => {
                error!(
                    topic = %record.topic,
                    partition = record.partition,
                    offset = record.offset,
                    error = %e,
                    "inbox insert failed"
                );
                continue;
            }
        };

        if let Err(e) = processor.process(&record).await {
            error!(
                inbox_id,
                topic = %record.topic,
                partition = record.partition,
                offset = record.offset,
                error = %e,
                "processor failed, row left unprocessed"
            );
            continue;
        }

        if let Err(e) = inbox.mark_processed(inbox_id).await {
            warn!(inbox_id, error = %e, "mark processed failed");
        }
    }
}
