//! Storage seams of the verification lifecycle.

pub mod store;

pub use store::{InMemoryKeyValueStore, KeyValueStore};
