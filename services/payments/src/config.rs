use orderflow_core::config::split_csv;

/// Payments service configuration loaded from environment variables.
#[derive(Debug)]
pub struct PaymentsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Kafka bootstrap brokers. Env var: `KAFKA_BROKERS` (comma-separated).
    pub kafka_brokers: Vec<String>,
    /// TCP port for the HTTP health server (default 3122). Env var: `PAYMENTS_PORT`.
    pub http_port: u16,
    /// Consumer group id (default "payments"). Env var: `PAYMENTS_CONSUMER_GROUP`.
    pub consumer_group: String,
    /// Topic consumed for new orders (default "orders.events").
    pub consumer_topic: String,
}

impl PaymentsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            kafka_brokers: split_csv(&std::env::var("KAFKA_BROKERS").expect("KAFKA_BROKERS")),
            http_port: std::env::var("PAYMENTS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3122),
            consumer_group: std::env::var("PAYMENTS_CONSUMER_GROUP")
                .unwrap_or_else(|_| "payments".to_owned()),
            consumer_topic: std::env::var("PAYMENTS_CONSUMER_TOPIC")
                .unwrap_or_else(|_| "orders.events".to_owned()),
        }
    }
}
