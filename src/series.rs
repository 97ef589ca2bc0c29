//! Altitude/azimuth time series for horizon charts

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;

use crate::astro::moon_position;
use crate::config::Location;
use crate::error::Error;

/// Hard cap on generated samples, to prevent excessive memory allocation
/// when a caller asks for a fine step over a wide window.
pub const MAX_SERIES_SAMPLES: usize = 10_000;

/// One chart sample. The timestamp keeps the caller's UTC offset so labels
/// render in the card's local time.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AltitudeSample {
    pub time: DateTime<FixedOffset>,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

/// A finite series of altitude samples ordered by increasing time.
#[derive(Debug, Clone, Serialize)]
pub struct AltitudeSeries {
    samples: Vec<AltitudeSample>,
}

impl AltitudeSeries {
    /// Sample the moon's position at `start + i * step` for `i in [0, count)`.
    ///
    /// # Errors
    /// Returns an error if `step_minutes` is not positive or `count` exceeds
    /// [`MAX_SERIES_SAMPLES`].
    pub fn sample(
        start: DateTime<FixedOffset>,
        step_minutes: i64,
        count: usize,
        location: &Location,
    ) -> Result<Self, Error> {
        if step_minutes <= 0 {
            return Err(Error::InvalidStep(step_minutes));
        }
        if count > MAX_SERIES_SAMPLES {
            return Err(Error::SeriesTooLong {
                requested: count,
                max: MAX_SERIES_SAMPLES,
            });
        }

        let step = Duration::minutes(step_minutes);
        let mut samples = Vec::with_capacity(count);
        let mut current = start;
        for _ in 0..count {
            let position = moon_position(&current.with_timezone(&Utc), location);
            samples.push(AltitudeSample {
                time: current,
                altitude_deg: position.altitude_deg,
                azimuth_deg: position.azimuth_deg,
            });
            current = current + step;
        }

        Ok(AltitudeSeries { samples })
    }

    /// Index of the sample whose timestamp is closest to `target`.
    ///
    /// Nearest, not floor/ceil; on a tie the first sample wins. `None` only
    /// for an empty series.
    pub fn nearest_index(&self, target: &DateTime<FixedOffset>) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (i, sample) in self.samples.iter().enumerate() {
            let distance = sample
                .time
                .signed_duration_since(*target)
                .num_milliseconds()
                .abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn samples(&self) -> &[AltitudeSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn here() -> Location {
        Location::new(50.66, 14.04).unwrap()
    }

    #[test]
    fn test_rejects_bad_step_and_length() {
        let start = local("2024-01-01T00:00:00+01:00");
        assert!(matches!(
            AltitudeSeries::sample(start, 0, 24, &here()),
            Err(Error::InvalidStep(0))
        ));
        assert!(matches!(
            AltitudeSeries::sample(start, -30, 24, &here()),
            Err(Error::InvalidStep(-30))
        ));
        assert!(matches!(
            AltitudeSeries::sample(start, 1, MAX_SERIES_SAMPLES + 1, &here()),
            Err(Error::SeriesTooLong { .. })
        ));
    }

    #[test]
    fn test_series_is_ordered_and_sized() {
        let start = local("2024-01-01T00:00:00+01:00");
        let series = AltitudeSeries::sample(start, 60, 24, &here()).unwrap();
        assert_eq!(series.len(), 24);
        for pair in series.samples().windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
        assert_eq!(series.samples()[0].time, start);
        assert_eq!(
            series.samples()[23].time,
            start + Duration::hours(23),
        );
    }

    #[test]
    fn test_nearest_index_prefers_closest_not_floor() {
        let start = local("2024-01-01T00:00:00+01:00");
        let series = AltitudeSeries::sample(start, 60, 24, &here()).unwrap();

        // 01:10 is nearer to 01:00 (index 1) than to 02:00 (index 2)
        let query = start + Duration::minutes(70);
        assert_eq!(series.nearest_index(&query), Some(1));

        // 01:50 rounds up
        let query = start + Duration::minutes(110);
        assert_eq!(series.nearest_index(&query), Some(2));

        // exact midpoint: first minimal-distance sample wins
        let query = start + Duration::minutes(90);
        assert_eq!(series.nearest_index(&query), Some(1));
    }

    #[test]
    fn test_nearest_index_clamps_to_ends() {
        let start = local("2024-01-01T00:00:00+01:00");
        let series = AltitudeSeries::sample(start, 60, 24, &here()).unwrap();
        let before = start - Duration::hours(5);
        let after = start + Duration::hours(40);
        assert_eq!(series.nearest_index(&before), Some(0));
        assert_eq!(series.nearest_index(&after), Some(23));
    }
}
