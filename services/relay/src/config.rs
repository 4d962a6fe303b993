use serde::Deserialize;

use orderflow_core::config::Config;

fn default_outbox_tables() -> String {
    "orders_outbox,payments_outbox".to_owned()
}

fn default_batch_size() -> u64 {
    100
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_produce_timeout_ms() -> u64 {
    3_000
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_max_retries() -> u32 {
    10
}

/// Relay configuration, loaded from the environment (`DATABASE_URL`,
/// `KAFKA_BROKERS`, `OUTBOX_TABLES`, ...). One worker is started per entry
/// in `outbox_tables`.
#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Kafka bootstrap brokers, comma-separated.
    pub kafka_brokers: String,
    #[serde(default = "default_outbox_tables")]
    pub outbox_tables: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_produce_timeout_ms")]
    pub produce_timeout_ms: u64,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Advisory only — a row past this many retries keeps retrying at the
    /// capped backoff; it is never dropped.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Config for RelayConfig {}
