use std::collections::HashMap;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, cmd};
use tracing::warn;

use orderflow_domain::order::OrderStatus;

use crate::domain::repository::{IdempotencyStore, StatusReadCache};
use crate::domain::types::{
    DONE_TTL_SECS, ERROR_TTL_SECS, IdemState, IdempotencyRecord, LOCK_TTL_SECS, RUN_TTL_SECS,
};
use crate::error::GatewayError;

fn lock_key(key: &str) -> String {
    format!("{key}:lock")
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Clone)]
pub struct RedisIdempotencyStore {
    pub pool: Pool,
}

impl RedisIdempotencyStore {
    async fn write_record(
        &self,
        key: &str,
        fields: &[(&str, String)],
        ttl_secs: u64,
    ) -> Result<(), GatewayError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| GatewayError::Internal(e.into()))?;
        let (): () = conn
            .hset_multiple(key, fields)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| GatewayError::Internal(e.into()))?;
        let (): () = conn
            .expire(key, ttl_secs as i64)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| GatewayError::Internal(e.into()))?;
        Ok(())
    }
}

impl IdempotencyStore for RedisIdempotencyStore {
    async fn load(&self, key: &str) -> Result<Option<IdempotencyRecord>, GatewayError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| GatewayError::Internal(e.into()))?;
        let map: HashMap<String, String> = conn
            .hgetall(key)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| GatewayError::Internal(e.into()))?;
        if map.is_empty() {
            return Ok(None);
        }
        Ok(Some(IdempotencyRecord {
            state: IdemState::parse(map.get("state").map(String::as_str).unwrap_or_default()),
            payload_hash: map.get("payload_hash").cloned().unwrap_or_default(),
            resp: map.get("resp").cloned(),
        }))
    }

    async fn try_lock(&self, key: &str) -> Result<bool, GatewayError> {
        let mut conn = self.pool.get().await.map_err(|e| {
            warn!(error = %e, "redis pool unavailable for lock");
            GatewayError::KvUnavailable
        })?;
        // SET NX EX: the atomic set-if-absent guarding the critical section.
        let acquired: Option<String> = cmd("SET")
            .arg(lock_key(key))
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(LOCK_TTL_SECS)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(error = %e, "redis lock failed");
                GatewayError::KvUnavailable
            })?;
        Ok(acquired.is_some())
    }

    async fn unlock(&self, key: &str) {
        let Ok(mut conn) = self.pool.get().await else {
            return;
        };
        let result: Result<i64, _> = conn.del(lock_key(key)).await;
        if let Err(e) = result {
            warn!(error = %e, "redis unlock failed");
        }
    }

    async fn mark_in_progress(&self, key: &str, payload_hash: &str) -> Result<(), GatewayError> {
        self.write_record(
            key,
            &[
                ("state", IdemState::InProgress.as_str().to_owned()),
                ("payload_hash", payload_hash.to_owned()),
                ("ts", now_rfc3339()),
            ],
            RUN_TTL_SECS,
        )
        .await
    }

    async fn store_done(
        &self,
        key: &str,
        payload_hash: &str,
        resp_json: &str,
    ) -> Result<(), GatewayError> {
        self.write_record(
            key,
            &[
                ("state", IdemState::Done.as_str().to_owned()),
                ("payload_hash", payload_hash.to_owned()),
                ("resp", resp_json.to_owned()),
                ("code", "OK".to_owned()),
                ("ts", now_rfc3339()),
            ],
            DONE_TTL_SECS,
        )
        .await
    }

    async fn store_error(
        &self,
        key: &str,
        payload_hash: &str,
        error: &str,
    ) -> Result<(), GatewayError> {
        self.write_record(
            key,
            &[
                ("state", IdemState::Error.as_str().to_owned()),
                ("payload_hash", payload_hash.to_owned()),
                ("code", "ERROR".to_owned()),
                ("err", error.to_owned()),
                ("ts", now_rfc3339()),
            ],
            ERROR_TTL_SECS,
        )
        .await
    }
}

// ── Status read-through cache ─────────────────────────────────────────────────

fn status_key(order_id: &str) -> String {
    format!("order:{order_id}:status")
}

#[derive(Clone)]
pub struct RedisStatusCache {
    pub pool: Pool,
    pub ttl: Duration,
}

impl StatusReadCache for RedisStatusCache {
    async fn get_status(&self, order_id: &str) -> Result<Option<OrderStatus>, GatewayError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| GatewayError::Internal(e.into()))?;
        let value: Option<String> = conn
            .get(status_key(order_id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| GatewayError::Internal(e.into()))?;
        Ok(value.as_deref().and_then(OrderStatus::parse))
    }

    async fn set_status(&self, order_id: &str, status: OrderStatus) -> Result<(), GatewayError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| GatewayError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(status_key(order_id), status.as_str(), self.ttl.as_secs())
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| GatewayError::Internal(e.into()))?;
        Ok(())
    }
}
