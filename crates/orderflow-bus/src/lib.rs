#![allow(async_fn_in_trait)]

pub mod consume;
pub mod error;
pub mod kafka;
pub mod record;
pub mod testing;

pub use consume::{InboxStore, RecordProcessor, run_consumer};
pub use error::BusError;
pub use kafka::{KafkaConsumer, KafkaProducer};
pub use record::{InboundRecord, OutboundRecord};

use std::time::Duration;

/// Port for publishing a batch of records to the bus.
///
/// Returns one result per input record in order. A failed record never fails
/// the batch — callers persist per-row outcomes.
pub trait BusProducer: Send + Sync {
    async fn produce(
        &self,
        records: &[OutboundRecord],
        timeout: Duration,
    ) -> Vec<Result<(), BusError>>;
}

/// Port for pulling the next record from a subscribed topic.
///
/// `Err(BusError::Closed)` means the source is exhausted and the consumer
/// loop should end; any other error is transient.
pub trait BusConsumer: Send + Sync {
    async fn next(&self) -> Result<InboundRecord, BusError>;
}
