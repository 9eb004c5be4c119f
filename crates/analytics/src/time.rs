//! Calendar helpers shared by the metrics and insights engines.
//!
//! The original data sources stamp trades in UTC; "local" day and hour
//! bucketing is expressed through an explicit `FixedOffset` so that results
//! are deterministic regardless of the host timezone.

use chrono::{DateTime, FixedOffset, Timelike, Utc};

/// `YYYY-MM-DD` day key in the given offset. Lexicographic order of these
/// keys is chronological order.
pub fn day_key(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%Y-%m-%d").to_string()
}

/// Calendar hour of day (0..=23) in the given offset.
pub fn local_hour(ts: DateTime<Utc>, offset: FixedOffset) -> u32 {
    ts.with_timezone(&offset).hour()
}
