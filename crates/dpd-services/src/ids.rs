//! Time-derived, strictly increasing record ids.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Hands out `max(now_ms, last + 1)`, so ids follow the wall clock but never
/// repeat, even for several records created inside one millisecond.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: AtomicI64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures future ids are greater than `floor` (e.g., the largest loaded id).
    pub fn observe(&self, floor: i64) {
        self.last.fetch_max(floor, Ordering::SeqCst);
    }

    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(current + 1);
            match self
                .last
                .compare_exchange(current, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}
