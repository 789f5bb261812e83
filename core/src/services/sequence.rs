//! Send-order ids and per-tenant monthly billing sequences.
//!
//! Both are store counters; a failed downstream write still consumes the
//! number, only uniqueness matters.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::keys::{year_month, KeySpace};
use crate::errors::DomainResult;
use crate::repositories::KeyValueStore;
use crate::services::clock::Clock;

/// A billing sequence and the instant whose month bucket issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingSequence {
    pub value: String,
    pub allocated_at: DateTime<Utc>,
}

pub struct SequenceGenerator {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    clock: Arc<dyn Clock>,
}

impl SequenceGenerator {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeySpace, clock: Arc<dyn Clock>) -> Self {
        Self { store, keys, clock }
    }

    /// Next value of the global send-order counter
    pub async fn next_send_order_id(&self) -> DomainResult<String> {
        let id = self.store.increment(&self.keys.send_order_counter()).await?;
        Ok(id.to_string())
    }

    /// Next billing sequence of `tenant` for the current month
    ///
    /// The counter key includes the year-month, so a new month starts at 1.
    /// Records keyed by the sequence must bucket by `allocated_at`.
    pub async fn next_billing_sequence(&self, tenant: &str) -> DomainResult<BillingSequence> {
        let allocated_at = self.clock.now();
        let key = self.keys.billing_counter(&year_month(allocated_at), tenant);
        let sequence = self.store.increment(&key).await?;
        Ok(BillingSequence {
            value: sequence.to_string(),
            allocated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryKeyValueStore;
    use crate::services::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn generator() -> (SequenceGenerator, Arc<InMemoryKeyValueStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 31, 23, 0, 0).unwrap(),
        ));
        let store = Arc::new(InMemoryKeyValueStore::new(clock.clone()));
        let generator = SequenceGenerator::new(store.clone(), KeySpace::default(), clock.clone());
        (generator, store, clock)
    }

    #[tokio::test]
    async fn test_send_order_ids_are_unique_and_increasing() {
        let (generator, store, _) = generator();

        assert_eq!(generator.next_send_order_id().await.unwrap(), "1");
        assert_eq!(generator.next_send_order_id().await.unwrap(), "2");
        assert_eq!(store.counter("sms:sq:global"), Some(2));
    }

    #[tokio::test]
    async fn test_billing_sequence_is_per_tenant_and_month() {
        let (generator, store, clock) = generator();

        assert_eq!(generator.next_billing_sequence("X").await.unwrap().value, "1");
        assert_eq!(generator.next_billing_sequence("X").await.unwrap().value, "2");
        assert_eq!(generator.next_billing_sequence("Y").await.unwrap().value, "1");

        clock.advance(Duration::hours(2));
        assert_eq!(generator.next_billing_sequence("X").await.unwrap().value, "1");

        assert_eq!(store.counter("sms:bil:26:10:X"), Some(2));
        assert_eq!(store.counter("sms:bil:26:11:X"), Some(1));
    }

    #[tokio::test]
    async fn test_allocation_instant_names_the_counter_month() {
        let (generator, _, clock) = generator();
        clock.advance(Duration::minutes(59));

        let sequence = generator.next_billing_sequence("X").await.unwrap();

        assert_eq!(year_month(sequence.allocated_at), "26:10");
        assert_eq!(sequence.allocated_at, clock.now());
    }
}
