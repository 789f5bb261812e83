//! Admission control per request key: cooldown between attempts and a
//! post-limit wait once the attempt maximum is reached.

mod limiter;


pub use limiter::{Admission, RateLimiter, COOLDOWN_MESSAGE};
