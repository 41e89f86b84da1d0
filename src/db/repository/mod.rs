pub mod contract;
pub mod document;
pub mod report;
pub mod review;
pub mod session;

use chrono::{NaiveDateTime, Utc};

/// Current time, truncated to whole seconds for stable round-trips.
pub(crate) fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now - chrono::Duration::nanoseconds(now.and_utc().timestamp_subsec_nanos() as i64)
}

/// Parse a stored timestamp. `%.f` tolerates optional fractional seconds.
pub(crate) fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .unwrap_or_default()
}
