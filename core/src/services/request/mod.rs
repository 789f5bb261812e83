//! In-flight verification records.

mod store;

#[cfg(test)]
mod tests;

pub use store::{RequestStore, SendCompletion};
