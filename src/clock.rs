//! Wall-clock helpers shared by latency probes

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Milliseconds elapsed since `start`
pub fn elapsed_millis(start: Instant) -> i64 {
    start.elapsed().as_millis() as i64
}
