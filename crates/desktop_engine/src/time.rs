//! Wall-clock access and the per-store modification clock.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Issues `date_modified` stamps that strictly increase per store, even within one millisecond.
pub struct ModifiedClock {
    last_ms: u64,
}

impl ModifiedClock {
    pub fn stamp(&mut self) -> u64 {
        self.stamp_at(unix_time_ms_now())
    }

    /// Stamps against a caller-supplied wall time.
    pub fn stamp_at(&mut self, now_ms: u64) -> u64 {
        self.last_ms = now_ms.max(self.last_ms.saturating_add(1));
        self.last_ms
    }

    pub fn last_ms(&self) -> u64 {
        self.last_ms
    }
}
