//! Fixed-window admission control for the write path.
//!
//! One cooldown window per client identity: a client that shortened a URL
//! must wait out the window before the next one is accepted. This trades
//! precision for O(1) state per client and no background maintenance; it is
//! coarse abuse mitigation, not a fairness mechanism.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// Denied; `retry_after` is the remaining window, rounded up to whole
    /// seconds, for user-facing messaging and the `Retry-After` header.
    Throttled { retry_after: Duration },
}

/// Per-client fixed-window rate limiter.
///
/// State is process-local and ephemeral. Expired windows are dropped lazily
/// when the map fills up; if everything is still live, the entry closest to
/// expiry is evicted so memory stays bounded at `max_clients`.
///
/// Client identity is opaque to this component; callers usually pass the
/// remote address.
pub struct FixedWindowLimiter {
    cooldown: chrono::Duration,
    max_clients: usize,
    windows: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl FixedWindowLimiter {
    pub fn new(cooldown: chrono::Duration, max_clients: usize) -> Self {
        Self {
            cooldown,
            max_clients,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a request from `client_id` is admitted at `now`.
    ///
    /// Allowed when no window is active or the active window has elapsed; a
    /// fresh window `now + cooldown` is recorded on admission, replacing any
    /// stale one.
    pub fn admit(&self, client_id: &str, now: DateTime<Utc>) -> Admission {
        let mut windows = self.windows.lock().expect("rate limiter state poisoned");

        if let Some(&reset_at) = windows.get(client_id) {
            if reset_at > now {
                return Admission::Throttled {
                    retry_after: round_up_seconds(reset_at - now),
                };
            }
        }

        if windows.len() >= self.max_clients && !windows.contains_key(client_id) {
            Self::evict(&mut windows, now);
        }

        windows.insert(client_id.to_string(), now + self.cooldown);
        Admission::Allowed
    }

    /// Drops expired windows; if the map is still full, drops the entry
    /// closest to expiry to free one slot.
    fn evict(windows: &mut HashMap<String, DateTime<Utc>>, now: DateTime<Utc>) {
        windows.retain(|_, reset_at| *reset_at > now);

        if windows.is_empty() {
            return;
        }

        let soonest = windows
            .iter()
            .min_by_key(|(_, reset_at)| **reset_at)
            .map(|(id, _)| id.clone());

        if let Some(id) = soonest {
            windows.remove(&id);
        }
    }
}

/// Rounds a positive duration up to whole seconds, never below one.
fn round_up_seconds(remaining: chrono::Duration) -> Duration {
    let mut secs = remaining.num_seconds();
    if remaining > chrono::Duration::seconds(secs) {
        secs += 1;
    }
    Duration::from_secs(secs.max(1) as u64)
}
