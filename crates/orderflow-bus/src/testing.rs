//! In-memory bus doubles for tests. Never used in production binaries.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::BusError;
use crate::record::{InboundRecord, OutboundRecord};
use crate::{BusConsumer, BusProducer};

/// Producer double that records everything published. Topics listed in
/// `fail_topics` report a per-record produce failure, which is how relay
/// tests exercise the backoff path.
#[derive(Default)]
pub struct MemoryProducer {
    pub produced: Mutex<Vec<OutboundRecord>>,
    pub fail_topics: HashSet<String>,
}

impl MemoryProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_topic(topic: &str) -> Self {
        Self {
            produced: Mutex::new(Vec::new()),
            fail_topics: HashSet::from([topic.to_owned()]),
        }
    }

    pub fn produced_topics(&self) -> Vec<String> {
        self.produced
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.topic.clone())
            .collect()
    }
}

impl BusProducer for MemoryProducer {
    async fn produce(
        &self,
        records: &[OutboundRecord],
        _timeout: Duration,
    ) -> Vec<Result<(), BusError>> {
        records
            .iter()
            .map(|rec| {
                if self.fail_topics.contains(&rec.topic) {
                    Err(BusError::Produce("broker unavailable".to_owned()))
                } else {
                    self.produced.lock().unwrap().push(rec.clone());
                    Ok(())
                }
            })
            .collect()
    }
}

/// Consumer double that yields a fixed sequence of records, then reports
/// `Closed` so `run_consumer` ends.
pub struct ScriptedConsumer {
    queue: Mutex<VecDeque<InboundRecord>>,
}

impl ScriptedConsumer {
    pub fn new(records: Vec<InboundRecord>) -> Self {
        Self {
            queue: Mutex::new(records.into()),
        }
    }
}

impl BusConsumer for ScriptedConsumer {
    async fn next(&self) -> Result<InboundRecord, BusError> {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(BusError::Closed)
    }
}
