/// Gateway configuration loaded from environment variables.
#[derive(Debug)]
pub struct GatewayConfig {
    /// Redis connection URL (idempotency records + status cache).
    pub redis_url: String,
    /// Orders service gRPC URL (e.g. "http://orders:50051"). Env var: `ORDERS_GRPC_URL`.
    pub orders_grpc_url: String,
    /// TCP port for the Checkout gRPC server (default 7070). Env var: `GATEWAY_GRPC_PORT`.
    pub grpc_port: u16,
    /// TCP port for the HTTP health server (default 3120). Env var: `GATEWAY_PORT`.
    pub http_port: u16,
    /// Per-call timeout towards orders, milliseconds (default 3000).
    pub orders_timeout_ms: u64,
    /// TTL used when backfilling the status cache, seconds (default 86400).
    pub status_ttl_secs: u64,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            orders_grpc_url: std::env::var("ORDERS_GRPC_URL").expect("ORDERS_GRPC_URL"),
            grpc_port: std::env::var("GATEWAY_GRPC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7070),
            http_port: std::env::var("GATEWAY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3120),
            orders_timeout_ms: std::env::var("ORDERS_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_000),
            status_ttl_secs: std::env::var("ORDER_STATUS_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
        }
    }
}
