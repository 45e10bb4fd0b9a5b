//! J2000 epoch handling and day arithmetic.
//!
//! All propagation works on a scalar "days since J2000"; `chrono` timestamps
//! only appear at the edges (CLI, window, file names).

use chrono::{DateTime, Duration, Utc};
use std::sync::LazyLock;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// The J2000 reference epoch: 2000-01-01 12:00 UTC.
pub static J2000_EPOCH: LazyLock<DateTime<Utc>> = LazyLock::new(|| {
    DateTime::parse_from_rfc3339("2000-01-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
});

/// Days (fractional) between `time` and the J2000 epoch.
pub fn j2000_days(time: DateTime<Utc>) -> f64 {
    (time - *J2000_EPOCH).num_milliseconds() as f64 / (1000.0 * SECONDS_PER_DAY)
}

/// Shift a timestamp by a fractional number of days.
pub fn offset_days(time: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    time + Duration::milliseconds((days * SECONDS_PER_DAY * 1000.0).round() as i64)
}

/// Date string shown in the viewer panel and plot annotation.
pub fn display_date(time: DateTime<Utc>) -> String {
    time.format("%d/%m/%Y").to_string()
}

/// Timestamp used to name exported pictures.
pub fn export_stamp(time: DateTime<Utc>) -> String {
    time.format("%Y%m%d_%H%M%S").to_string()
}
