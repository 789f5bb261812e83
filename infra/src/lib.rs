//! # Infrastructure Layer
//!
//! Concrete implementations of the core seams:
//! - **Cache**: Redis client and the Redis-backed `KeyValueStore`
//! - **SMS**: vendor verification providers (Sinch, Zenvia) and a mock
//! - **Audit**: HTTP sink shipping audit events to the log service

pub mod audit;
pub mod cache;
pub mod errors;
pub mod sms;

pub use audit::HttpAuditSink;
pub use cache::{RedisClient, RedisKeyValueStore};
pub use errors::InfrastructureError;
pub use sms::{create_providers, MockProvider, SinchProvider, ZenviaProvider};
