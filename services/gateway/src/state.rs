use std::time::Duration;

use deadpool_redis::Pool as RedisPool;

use crate::infra::kv::{RedisIdempotencyStore, RedisStatusCache};
use crate::infra::orders_client::GrpcOrdersPort;

/// Shared application state passed to the gRPC server.
#[derive(Clone)]
pub struct AppState {
    pub redis: RedisPool,
    pub orders: GrpcOrdersPort,
    pub status_ttl: Duration,
}

impl AppState {
    pub fn idem_store(&self) -> RedisIdempotencyStore {
        RedisIdempotencyStore {
            pool: self.redis.clone(),
        }
    }

    pub fn status_cache(&self) -> RedisStatusCache {
        RedisStatusCache {
            pool: self.redis.clone(),
            ttl: self.status_ttl,
        }
    }

    pub fn orders_port(&self) -> GrpcOrdersPort {
        self.orders.clone()
    }
}
