//! In-process key-value store with TTLs driven by a [`Clock`].
//!
//! Used by tests and local development. Mirrors the store semantics the
//! services rely on: atomic increments, hash fields, key expiry at or after
//! the deadline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{DomainError, DomainResult};
use crate::services::clock::{Clock, SystemClock};

use super::KeyValueStore;

#[derive(Debug, Clone)]
enum StoredValue {
    Hash(HashMap<String, String>),
    Counter(i64),
}

#[derive(Debug, Clone)]
struct Entry {
    value: StoredValue,
    expires_at: Option<DateTime<Utc>>,
}

pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    failing_prefixes: Mutex<Vec<String>>,
    unavailable: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            failing_prefixes: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every operation on keys starting with `prefix` fail
    pub fn fail_keys_with_prefix(&self, prefix: impl Into<String>) {
        lock(&self.failing_prefixes).push(prefix.into());
    }

    pub fn clear_failures(&self) {
        lock(&self.failing_prefixes).clear();
        self.unavailable.store(false, Ordering::SeqCst);
    }

    /// Simulate a store outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// All fields of a live hash
    pub fn hash_get_all(&self, key: &str) -> Option<HashMap<String, String>> {
        let mut entries = lock(&self.entries);
        match self.live_entry(&mut entries, key)?.value {
            StoredValue::Hash(ref hash) => Some(hash.clone()),
            StoredValue::Counter(_) => None,
        }
    }

    /// Value of a live counter key
    pub fn counter(&self, key: &str) -> Option<i64> {
        let mut entries = lock(&self.entries);
        match self.live_entry(&mut entries, key)?.value {
            StoredValue::Counter(value) => Some(value),
            StoredValue::Hash(_) => None,
        }
    }

    /// Remaining time-to-live of a live key, `None` when absent or persistent
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        let mut entries = lock(&self.entries);
        let expires_at = self.live_entry(&mut entries, key)?.expires_at?;
        (expires_at - now).to_std().ok()
    }

    /// Live keys starting with `prefix`, sorted
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = self.clock.now();
        let entries = lock(&self.entries);
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !is_expired(entry, now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn live_entry<'a>(
        &self,
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
    ) -> Option<&'a mut Entry> {
        let now = self.clock.now();
        if entries.get(key).map(|e| is_expired(e, now)).unwrap_or(false) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }

    fn check(&self, key: &str, write: bool) -> DomainResult<()> {
        let failing = self.unavailable.load(Ordering::SeqCst)
            || lock(&self.failing_prefixes)
                .iter()
                .any(|prefix| key.starts_with(prefix.as_str()));
        if !failing {
            return Ok(());
        }
        let message = format!("store unavailable for key {}", key);
        if write {
            Err(DomainError::store_write(message))
        } else {
            Err(DomainError::store_read(message))
        }
    }

    fn hash_mut<'a>(
        &self,
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
    ) -> DomainResult<&'a mut HashMap<String, String>> {
        if self.live_entry(entries, key).is_none() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: StoredValue::Hash(HashMap::new()),
                    expires_at: None,
                },
            );
        }
        match entries.get_mut(key) {
            Some(Entry {
                value: StoredValue::Hash(hash),
                ..
            }) => Ok(hash),
            _ => Err(DomainError::store_write(format!(
                "WRONGTYPE key {} does not hold a hash",
                key
            ))),
        }
    }

    fn set_fields(&self, key: &str, fields: &[(&str, &str)]) -> DomainResult<()> {
        let mut entries = lock(&self.entries);
        let hash = self.hash_mut(&mut entries, key)?;
        for (field, value) in fields {
            hash.insert((*field).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn set_expiry(&self, key: &str, ttl: Duration) -> DomainResult<()> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| DomainError::store_write(format!("invalid ttl: {}", e)))?;
        let deadline = self.clock.now() + ttl;
        let mut entries = lock(&self.entries);
        if let Some(entry) = self.live_entry(&mut entries, key) {
            entry.expires_at = Some(deadline);
        }
        Ok(())
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn hash_set(&self, key: &str, fields: &[(&str, &str)]) -> DomainResult<()> {
        self.check(key, true)?;
        self.set_fields(key, fields)
    }

    async fn hash_get(&self, key: &str, fields: &[&str]) -> DomainResult<Vec<Option<String>>> {
        self.check(key, false)?;
        let mut entries = lock(&self.entries);
        let hash = match self.live_entry(&mut entries, key) {
            None => return Ok(vec![None; fields.len()]),
            Some(Entry {
                value: StoredValue::Hash(hash),
                ..
            }) => hash,
            Some(_) => {
                return Err(DomainError::store_read(format!(
                    "WRONGTYPE key {} does not hold a hash",
                    key
                )))
            }
        };
        Ok(fields.iter().map(|f| hash.get(*f).cloned()).collect())
    }

    async fn hash_delete(&self, key: &str, fields: &[&str]) -> DomainResult<()> {
        self.check(key, true)?;
        let mut entries = lock(&self.entries);
        let now_empty = match self.live_entry(&mut entries, key) {
            Some(Entry {
                value: StoredValue::Hash(hash),
                ..
            }) => {
                for field in fields {
                    hash.remove(*field);
                }
                hash.is_empty()
            }
            _ => false,
        };
        // An emptied hash no longer exists
        if now_empty {
            entries.remove(key);
        }
        Ok(())
    }

    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> DomainResult<i64> {
        self.check(key, true)?;
        let mut entries = lock(&self.entries);
        let hash = self.hash_mut(&mut entries, key)?;
        let current = match hash.get(field) {
            None => 0,
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                DomainError::store_write(format!("hash value {}.{} is not an integer", key, field))
            })?,
        };
        let next = current + delta;
        hash.insert(field.to_string(), next.to_string());
        Ok(next)
    }

    async fn increment(&self, key: &str) -> DomainResult<i64> {
        self.check(key, true)?;
        let mut entries = lock(&self.entries);
        if self.live_entry(&mut entries, key).is_none() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: StoredValue::Counter(0),
                    expires_at: None,
                },
            );
        }
        match entries.get_mut(key) {
            Some(Entry {
                value: StoredValue::Counter(value),
                ..
            }) => {
                *value += 1;
                Ok(*value)
            }
            _ => Err(DomainError::store_write(format!(
                "WRONGTYPE key {} does not hold an integer",
                key
            ))),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> DomainResult<()> {
        self.check(key, true)?;
        self.set_expiry(key, ttl)
    }

    async fn hash_set_with_expiry(
        &self,
        key: &str,
        fields: &[(&str, &str)],
        ttl: Duration,
    ) -> DomainResult<()> {
        self.check(key, true)?;
        self.set_fields(key, fields)?;
        self.set_expiry(key, ttl)
    }

    async fn ping(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::store_read("store unavailable"));
        }
        Ok(())
    }
}

fn is_expired(entry: &Entry, now: DateTime<Utc>) -> bool {
    entry.expires_at.map(|at| now >= at).unwrap_or(false)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
