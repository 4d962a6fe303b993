use std::time::Duration;

use futures::future::join_all;
use rdkafka::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{Header, Headers, Message, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::error::BusError;
use crate::record::{InboundRecord, OutboundRecord};
use crate::{BusConsumer, BusProducer};

/// Kafka producer adapter. One instance is shared by all relay workers.
pub struct KafkaProducer {
    producer: FutureProducer,
}

impl KafkaProducer {
    pub fn new(brokers: &[String]) -> Result<Self, BusError> {
        let producer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("message.timeout.ms", "3000")
            .create()
            .map_err(|e| BusError::Config(e.to_string()))?;
        Ok(Self { producer })
    }

    /// Fetch cluster metadata as a startup liveness probe.
    pub fn ping(&self, timeout: Duration) -> Result<(), BusError> {
        use rdkafka::producer::Producer;
        self.producer
            .client()
            .fetch_metadata(None, Timeout::After(timeout))
            .map(|_| ())
            .map_err(|e| BusError::Config(e.to_string()))
    }
}

impl BusProducer for KafkaProducer {
    async fn produce(
        &self,
        records: &[OutboundRecord],
        timeout: Duration,
    ) -> Vec<Result<(), BusError>> {
        let sends = records.iter().map(|rec| {
            let mut headers = OwnedHeaders::new_with_capacity(rec.headers.len());
            for (name, value) in &rec.headers {
                headers = headers.insert(Header {
                    key: name,
                    value: Some(value.as_bytes()),
                });
            }
            let fut = self.producer.send(
                FutureRecord::to(&rec.topic)
                    .key(&rec.key)
                    .payload(&rec.payload)
                    .headers(headers),
                Timeout::After(timeout),
            );
            async move {
                match tokio::time::timeout(timeout, fut).await {
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err((err, _))) => Err(BusError::Produce(err.to_string())),
                    Err(_) => Err(BusError::Produce(format!(
                        "delivery not acknowledged within {timeout:?}"
                    ))),
                }
            }
        });
        join_all(sends).await
    }
}

/// Kafka consumer-group adapter for a single topic.
pub struct KafkaConsumer {
    consumer: StreamConsumer,
}

impl KafkaConsumer {
    pub fn new(brokers: &[String], group: &str, topic: &str) -> Result<Self, BusError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("group.id", group)
            .set("auto.offset.reset", "earliest")
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|e| BusError::Config(e.to_string()))?;
        consumer
            .subscribe(&[topic])
            .map_err(|e| BusError::Config(e.to_string()))?;
        Ok(Self { consumer })
    }
}

impl BusConsumer for KafkaConsumer {
    async fn next(&self) -> Result<InboundRecord, BusError> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(|e| BusError::Consume(e.to_string()))?;

        let headers = message
            .headers()
            .map(|hs| {
                hs.iter()
                    .map(|h| {
                        (
                            h.key.to_owned(),
                            String::from_utf8_lossy(h.value.unwrap_or_default()).into_owned(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(InboundRecord {
            topic: message.topic().to_owned(),
            partition: message.partition(),
            offset: message.offset(),
            key: message.key().unwrap_or_default().to_vec(),
            headers,
            payload: message.payload().unwrap_or_default().to_vec(),
        })
    }
}
