use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A fixed look-back period over which metrics are computed.
///
/// The interval is half-open: `start` is inside, `end` is outside. Windows
/// that share an end instant therefore nest cleanly: everything inside a
/// 7-day window is inside the 30-day window ending at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ActivityWindow {
    /// Build a window covering the `days` before `end`.
    pub fn ending_at(end: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}
