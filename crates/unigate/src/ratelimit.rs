use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Bucket {
    hits: u64,
    resets_at: Instant,
}

/// In-process fixed-window rate limiter
///
/// Buckets are keyed by arbitrary strings and shared across clones, so a
/// limiter stored in application state throttles all request handlers.
#[derive(Default, Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, Bucket>>>,
}

impl RateLimiter {
    /// Whether a key has used up its attempts for the current window
    pub fn too_many_attempts(&self, key: &str, max_attempts: u64) -> bool {
        let buckets = self.buckets.lock().expect("poisoned `buckets`");
        match buckets.get(key) {
            Some(bucket) => bucket.resets_at > Instant::now() && bucket.hits >= max_attempts,
            None => false,
        }
    }

    /// Record an attempt against a key
    pub fn hit(&self, key: &str, decay: Duration) {
        let mut buckets = self.buckets.lock().expect("poisoned `buckets`");
        let now = Instant::now();

        match buckets.get_mut(key) {
            Some(bucket) if bucket.resets_at > now => {
                bucket.hits += 1;
            }
            _ => {
                buckets.insert(
                    key.to_string(),
                    Bucket {
                        hits: 1,
                        resets_at: now + decay,
                    },
                );
            }
        }
    }

    /// Forget all attempts recorded against a key
    pub fn clear(&self, key: &str) {
        let mut buckets = self.buckets.lock().expect("poisoned `buckets`");
        buckets.remove(key);
    }

    /// Seconds until a key's window resets
    ///
    /// Returns at least one second for a live bucket so callers can
    /// always report a meaningful retry delay.
    pub fn available_in(&self, key: &str) -> u64 {
        let buckets = self.buckets.lock().expect("poisoned `buckets`");
        match buckets.get(key) {
            Some(bucket) => {
                let remaining = bucket
                    .resets_at
                    .saturating_duration_since(Instant::now())
                    .as_secs();

                remaining.max(1)
            }
            None => 0,
        }
    }
}
