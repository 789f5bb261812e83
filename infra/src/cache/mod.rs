//! Cache module for the Redis-backed key-value store
//!
//! Provides the Redis client (bounded concurrency, timeouts, retry with
//! exponential backoff) and the `KeyValueStore` implementation on top of it.

pub mod kv_store;
pub mod redis_client;


pub use kv_store::RedisKeyValueStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use sms_shared::config::RedisConfig;
