use orderflow_core::config::split_csv;

/// Orders service configuration loaded from environment variables.
#[derive(Debug)]
pub struct OrdersConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (order status cache).
    pub redis_url: String,
    /// Kafka bootstrap brokers. Env var: `KAFKA_BROKERS` (comma-separated).
    pub kafka_brokers: Vec<String>,
    /// TCP port for the gRPC server (default 50051). Env var: `ORDERS_GRPC_PORT`.
    pub grpc_port: u16,
    /// TCP port for the HTTP health server (default 3121). Env var: `ORDERS_PORT`.
    pub http_port: u16,
    /// Consumer group id (default "orders"). Env var: `ORDERS_CONSUMER_GROUP`.
    pub consumer_group: String,
    /// Topic consumed for payment outcomes (default "payments.events").
    pub consumer_topic: String,
    /// TTL for the cached order status, seconds (default 86400).
    pub status_ttl_secs: u64,
}

impl OrdersConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            kafka_brokers: split_csv(&std::env::var("KAFKA_BROKERS").expect("KAFKA_BROKERS")),
            grpc_port: std::env::var("ORDERS_GRPC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50051),
            http_port: std::env::var("ORDERS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3121),
            consumer_group: std::env::var("ORDERS_CONSUMER_GROUP")
                .unwrap_or_else(|_| "orders".to_owned()),
            consumer_topic: std::env::var("ORDERS_CONSUMER_TOPIC")
                .unwrap_or_else(|_| "payments.events".to_owned()),
            status_ttl_secs: std::env::var("ORDER_STATUS_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
        }
    }
}
