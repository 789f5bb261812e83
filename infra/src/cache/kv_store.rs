//! Redis-backed `KeyValueStore`

use std::time::Duration;

use async_trait::async_trait;
use redis::{Cmd, Pipeline};
use tracing::debug;

use sms_core::errors::DomainResult;
use sms_core::repositories::KeyValueStore;

use super::RedisClient;

/// `KeyValueStore` over Redis hashes and counters
///
/// Multi-field writes are single pipelined round trips without `MULTI`, so a
/// failure part way through can leave a partial write.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    client: RedisClient,
}

impl RedisKeyValueStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    async fn run_pipeline(&self, name: &'static str, pipeline: Pipeline) -> Result<(), crate::InfrastructureError> {
        self.client
            .execute_with_retry(name, move |mut conn| {
                let pipeline = pipeline.clone();
                Box::pin(async move { pipeline.query_async::<_, ()>(&mut conn).await })
            })
            .await
    }
}

fn hset(key: &str, fields: &[(&str, &str)]) -> Cmd {
    let mut cmd = redis::cmd("HSET");
    cmd.arg(key);
    for (field, value) in fields {
        cmd.arg(*field).arg(*value);
    }
    cmd
}

fn ttl_seconds(ttl: Duration) -> u64 {
    // EXPIRE 0 deletes the key outright
    ttl.as_secs().max(1)
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn hash_set(&self, key: &str, fields: &[(&str, &str)]) -> DomainResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let cmd = hset(key, fields);
        self.client
            .execute_with_retry("HSET", move |mut conn| {
                let cmd = cmd.clone();
                Box::pin(async move { cmd.query_async::<_, ()>(&mut conn).await })
            })
            .await
            .map_err(|e| e.into_store_write())
    }

    async fn hash_get(&self, key: &str, fields: &[&str]) -> DomainResult<Vec<Option<String>>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("HMGET");
        cmd.arg(key).arg(fields);
        self.client
            .execute_with_retry("HMGET", move |mut conn| {
                let cmd = cmd.clone();
                Box::pin(async move { cmd.query_async::<_, Vec<Option<String>>>(&mut conn).await })
            })
            .await
            .map_err(|e| e.into_store_read())
    }

    async fn hash_delete(&self, key: &str, fields: &[&str]) -> DomainResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut pipeline = redis::pipe();
        for field in fields {
            pipeline.cmd("HDEL").arg(key).arg(*field).ignore();
        }
        debug!(key = key, fields = fields.len(), "Deleting hash fields");
        self.run_pipeline("HDEL", pipeline)
            .await
            .map_err(|e| e.into_store_write())
    }

    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> DomainResult<i64> {
        let mut cmd = redis::cmd("HINCRBY");
        cmd.arg(key).arg(field).arg(delta);
        self.client
            .execute_once("HINCRBY", move |mut conn| {
                let cmd = cmd.clone();
                Box::pin(async move { cmd.query_async::<_, i64>(&mut conn).await })
            })
            .await
            .map_err(|e| e.into_store_write())
    }

    async fn increment(&self, key: &str) -> DomainResult<i64> {
        let mut cmd = redis::cmd("INCR");
        cmd.arg(key);
        self.client
            .execute_once("INCR", move |mut conn| {
                let cmd = cmd.clone();
                Box::pin(async move { cmd.query_async::<_, i64>(&mut conn).await })
            })
            .await
            .map_err(|e| e.into_store_write())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> DomainResult<()> {
        let mut cmd = redis::cmd("EXPIRE");
        cmd.arg(key).arg(ttl_seconds(ttl));
        self.client
            .execute_with_retry("EXPIRE", move |mut conn| {
                let cmd = cmd.clone();
                Box::pin(async move { cmd.query_async::<_, ()>(&mut conn).await })
            })
            .await
            .map_err(|e| e.into_store_write())
    }

    async fn hash_set_with_expiry(
        &self,
        key: &str,
        fields: &[(&str, &str)],
        ttl: Duration,
    ) -> DomainResult<()> {
        let mut pipeline = redis::pipe();
        pipeline.add_command(hset(key, fields)).ignore();
        pipeline.cmd("EXPIRE").arg(key).arg(ttl_seconds(ttl)).ignore();
        self.run_pipeline("HSET+EXPIRE", pipeline)
            .await
            .map_err(|e| e.into_store_write())
    }

    async fn ping(&self) -> DomainResult<()> {
        self.client
            .health_check()
            .await
            .map_err(|e| e.into_store_read())
    }
}
