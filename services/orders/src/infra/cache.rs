use std::time::Duration;

use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use uuid::Uuid;

use orderflow_domain::order::OrderStatus;

use crate::domain::repository::StatusCache;
use crate::error::OrdersServiceError;

#[derive(Clone)]
pub struct RedisStatusCache {
    pub pool: Pool,
    pub ttl: Duration,
}

fn status_key(order_id: Uuid) -> String {
    format!("order:{order_id}:status")
}

impl StatusCache for RedisStatusCache {
    async fn set_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| OrdersServiceError::Internal(e.into()))?;
        let key = status_key(order_id);
        let (): () = conn
            .set_ex(&key, status.as_str(), self.ttl.as_secs())
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| OrdersServiceError::Internal(e.into()))?;
        Ok(())
    }
}
