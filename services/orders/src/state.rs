use std::time::Duration;

use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::infra::cache::RedisStatusCache;
use crate::infra::db::{DbInboxStore, DbOrderRepository};

/// Shared application state passed to the gRPC server and the consumer.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub status_ttl: Duration,
}

impl AppState {
    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn inbox_store(&self) -> DbInboxStore {
        DbInboxStore {
            db: self.db.clone(),
        }
    }

    pub fn status_cache(&self) -> RedisStatusCache {
        RedisStatusCache {
            pool: self.redis.clone(),
            ttl: self.status_ttl,
        }
    }
}
