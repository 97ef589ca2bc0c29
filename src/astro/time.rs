//! Time conversions for the astronomical models

use chrono::{DateTime, Utc};

pub(crate) const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Days from the Unix epoch to J2000.0 (2000-01-01 12:00 UT).
const J2000_UNIX_DAYS: f64 = 10_957.5;

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Convert a UTC instant to fractional days since J2000.0
#[inline]
pub(crate) fn to_days(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / MILLIS_PER_DAY - J2000_UNIX_DAYS
}

/// Local apparent sidereal time in radians for an east-positive longitude
#[inline]
pub(crate) fn sidereal_time(days: f64, lon_rad: f64) -> f64 {
    (280.16 + 360.985_623_5 * days).to_radians() + lon_rad
}
