use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Lets one line per key through every `interval` and counts the rest.
///
/// `new` is `const`, so a throttle can live in a `static` next to the code
/// that logs through it.
pub struct LogThrottle {
    interval: Duration,
    seen: Mutex<BTreeMap<&'static str, (Instant, u64)>>,
}

impl LogThrottle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            seen: Mutex::new(BTreeMap::new()),
        }
    }

    /// `Some(dropped)` when the line for `key` may be written, `dropped`
    /// being how many were held back since the last one.
    pub fn admit(&self, key: &'static str) -> Option<u64> {
        self.admit_at(key, Instant::now())
    }

    fn admit_at(&self, key: &'static str, now: Instant) -> Option<u64> {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let (last, dropped) = match seen.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert((now, 0));
                return Some(0);
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if now.saturating_duration_since(*last) < self.interval {
            *dropped += 1;
            return None;
        }
        *last = now;
        Some(std::mem::take(dropped))
    }
}
