use std::sync::Arc;

use sms_shared::config::RateLimitConfig;

use crate::domain::keys::{fields, format_timestamp, parse_timestamp};
use crate::errors::DomainResult;
use crate::repositories::KeyValueStore;
use crate::services::clock::Clock;

pub const COOLDOWN_MESSAGE: &str = "Too many requests. Try again shortly";

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// `attempt` is the attempt counter after this admission
    Admitted { attempt: i64 },
    /// `message` is a human-readable wait hint
    Rejected { message: String },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// Rate limiter keeping its state in hidden fields of the request hash
///
/// The last-attempt read and the counter increment are separate store
/// operations. Concurrent checks on the same key can therefore admit more
/// attempts than `max_attempts`; only the increment itself is atomic.
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: RateLimitConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Decide whether a new attempt on `key` may proceed
    ///
    /// 1. Within the cooldown of the last admitted attempt: reject, no counter moves.
    /// 2. Otherwise increment the attempt counter.
    /// 3. Up to `max_attempts`: record the attempt time and admit.
    /// 4. Beyond it: reject with the minutes left of the post-limit wait, or,
    ///    once the wait has elapsed, restart the counter at 1 and admit.
    pub async fn admit(&self, key: &str) -> DomainResult<Admission> {
        let now = self.clock.now();
        let last_attempt = self
            .store
            .hash_get(key, &[fields::LAST_ATTEMPT_AT])
            .await?
            .into_iter()
            .next()
            .flatten()
            .and_then(|raw| parse_timestamp(&raw));

        // Absent last attempt counts as infinitely far in the past
        let elapsed_seconds = last_attempt.map(|at| (now - at).num_seconds());

        if let Some(elapsed) = elapsed_seconds {
            if elapsed < self.config.cooldown_seconds as i64 {
                tracing::debug!(key = key, elapsed_seconds = elapsed, "Attempt within cooldown");
                return Ok(Admission::Rejected {
                    message: COOLDOWN_MESSAGE.to_string(),
                });
            }
        }

        let attempt = self
            .store
            .hash_increment(key, fields::ATTEMPT_COUNT, 1)
            .await?;
        let stamp = format_timestamp(now);

        if attempt <= self.config.max_attempts as i64 {
            self.store
                .hash_set(key, &[(fields::LAST_ATTEMPT_AT, stamp.as_str())])
                .await?;
            return Ok(Admission::Admitted { attempt });
        }

        let window_seconds = (self.config.post_limit_wait_minutes * 60) as i64;
        match elapsed_seconds {
            Some(elapsed) if elapsed < window_seconds => {
                let remaining_minutes = ((window_seconds - elapsed) + 59) / 60;
                tracing::warn!(
                    key = key,
                    attempt = attempt,
                    remaining_minutes = remaining_minutes,
                    event = "attempt_limit_reached",
                    "Attempt limit reached"
                );
                Ok(Admission::Rejected {
                    message: limit_message(remaining_minutes),
                })
            }
            _ => {
                self.store
                    .hash_set(
                        key,
                        &[
                            (fields::ATTEMPT_COUNT, "1"),
                            (fields::LAST_ATTEMPT_AT, stamp.as_str()),
                        ],
                    )
                    .await?;
                tracing::info!(key = key, event = "attempt_window_reset", "Attempt counter restarted");
                Ok(Admission::Admitted { attempt: 1 })
            }
        }
    }

    /// Clear the attempt counter and last-attempt time of `key`
    pub async fn reset(&self, key: &str) -> DomainResult<()> {
        self.store
            .hash_delete(key, &[fields::ATTEMPT_COUNT, fields::LAST_ATTEMPT_AT])
            .await
    }
}

fn limit_message(remaining_minutes: i64) -> String {
    let wait = if remaining_minutes <= 1 {
        String::from("1 minute")
    } else {
        format!("{} minutes", remaining_minutes)
    };
    format!("Maximum number of attempts reached. Try again in {}", wait)
}
