//! Error types for the lunar computation core

use thiserror::Error;

/// Errors surfaced to the caller. Degenerate astronomy (a day without a
/// moonrise or moonset) is not an error; it is represented as absent data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("latitude must be a finite value in [-90, 90] degrees, got {0}")]
    InvalidLatitude(f64),

    #[error("longitude must be a finite value in [-180, 180] degrees, got {0}")]
    InvalidLongitude(f64),

    #[error("step_minutes must be positive, got {0}")]
    InvalidStep(i64),

    #[error("series would generate {requested} samples (max: {max}); use a larger step or a smaller count")]
    SeriesTooLong { requested: usize, max: usize },

    #[error("{year}-{month} is not a valid calendar month")]
    InvalidCalendarMonth { year: i32, month: u32 },
}
