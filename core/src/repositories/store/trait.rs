//! Key-value store trait, the single source of truth for every record.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Hash-oriented key-value store
///
/// Reads fail with `DomainError::StoreRead`, writes with
/// `DomainError::StoreWrite`. Multi-field operations are single round trips
/// but not transactional.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Set hash fields, creating the key when absent
    async fn hash_set(&self, key: &str, fields: &[(&str, &str)]) -> DomainResult<()>;

    /// Read hash fields in order; missing keys or fields read as `None`
    async fn hash_get(&self, key: &str, fields: &[&str]) -> DomainResult<Vec<Option<String>>>;

    /// Delete hash fields in one pipelined batch
    ///
    /// A failure part way through can leave some fields deleted.
    async fn hash_delete(&self, key: &str, fields: &[&str]) -> DomainResult<()>;

    /// Atomically add `delta` to an integer hash field, returning the new value
    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> DomainResult<i64>;

    /// Atomically increment an integer key, returning the new value
    async fn increment(&self, key: &str) -> DomainResult<i64>;

    /// Set the time-to-live of a key
    async fn expire(&self, key: &str, ttl: Duration) -> DomainResult<()>;

    /// Set hash fields and the key's time-to-live in one pipelined batch
    async fn hash_set_with_expiry(
        &self,
        key: &str,
        fields: &[(&str, &str)],
        ttl: Duration,
    ) -> DomainResult<()>;

    /// Check connectivity
    async fn ping(&self) -> DomainResult<()>;
}
