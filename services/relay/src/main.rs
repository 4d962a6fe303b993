use std::sync::Arc;
use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use orderflow_bus::KafkaProducer;
use orderflow_core::config::{Config, split_csv};
use orderflow_core::shutdown::{SHUTDOWN_GRACE, shutdown_token};
use orderflow_core::tracing::init_tracing;

use orderflow_relay::config::RelayConfig;
use orderflow_relay::store::SeaOrmOutboxStore;
use orderflow_relay::worker::{RelayWorker, WorkerConfig};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = RelayConfig::from_env();
    let tables = split_csv(&config.outbox_tables);
    assert!(!tables.is_empty(), "OUTBOX_TABLES must name at least one table");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let brokers = split_csv(&config.kafka_brokers);
    let producer = Arc::new(KafkaProducer::new(&brokers).expect("failed to create Kafka producer"));
    // Fail fast when the cluster is unreachable instead of spinning workers.
    producer
        .ping(Duration::from_secs(3))
        .expect("kafka metadata probe failed");

    info!(
        workers = tables.len(),
        brokers = brokers.len(),
        max_retries = config.max_retries,
        "relay starting"
    );

    let cancel = shutdown_token();
    let mut handles = Vec::with_capacity(tables.len());
    for table in tables {
        let worker = RelayWorker {
            store: SeaOrmOutboxStore::new(db.clone(), table.clone()),
            producer: Arc::clone(&producer),
            cfg: WorkerConfig {
                table,
                batch_size: config.batch_size,
                poll_interval: Duration::from_millis(config.poll_interval_ms),
                produce_timeout: Duration::from_millis(config.produce_timeout_ms),
                backoff_base_ms: config.backoff_base_ms,
            },
        };
        let token = cancel.child_token();
        handles.push(tokio::spawn(async move { worker.run(token).await }));
    }

    cancel.cancelled().await;
    for handle in handles {
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, handle).await;
    }

    info!("relay stopped");
}
