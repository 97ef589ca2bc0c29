//! Rise, set and highest-transit search
//!
//! Scans the 24 h window from a given start in 2 h steps and refines
//! horizon crossings and the altitude maximum with a parabola through each
//! three-sample window. Days on which the moon never crosses the horizon
//! yield `None` for the missing events instead of an error.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::moon::moon_position;
use crate::config::Location;

/// Altitude the moon's upper limb must clear to count as risen, radians
/// (0.133°, the mean lunar semidiameter plus horizon refraction).
const HORIZON_OFFSET: f64 = 0.002_321_287_905;

/// Moon events for one 24 h window. `rise` and `set` are the first such
/// crossings inside the window; either may be absent at polar latitudes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoonTimes {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
    pub transit: Option<DateTime<Utc>>,
}

/// Search `[start, start+24h)` for moonrise, moonset and the highest transit.
pub fn moon_times(start: &DateTime<Utc>, location: &Location) -> MoonTimes {
    let altitude_at = |hours: f64| -> f64 {
        let t = *start + Duration::milliseconds((hours * 3_600_000.0).round() as i64);
        moon_position(&t, location).altitude_deg.to_radians() - HORIZON_OFFSET
    };

    let mut rise_hour: Option<f64> = None;
    let mut set_hour: Option<f64> = None;
    let mut best_transit: Option<(f64, f64)> = None; // (hour, altitude)

    let mut h0 = altitude_at(0.0);
    let mut i = 1.0;
    while i <= 23.0 {
        let h1 = altitude_at(i);
        let h2 = altitude_at(i + 1.0);

        // parabola through the three samples, x in [-1, 1] around the middle
        let a = (h0 + h2) / 2.0 - h1;
        let b = (h2 - h0) / 2.0;
        let xe = -b / (2.0 * a);
        let ye = (a * xe + b) * xe + h1;
        let disc = b * b - 4.0 * a * h1;

        if a < 0.0 && xe.abs() <= 1.0 && i + xe < 24.0 {
            let candidate = (i + xe, ye);
            if best_transit.map_or(true, |(_, alt)| candidate.1 > alt) {
                best_transit = Some(candidate);
            }
        } else if best_transit.map_or(true, |(_, alt)| h1 > alt) {
            best_transit = Some((i, h1));
        }

        if disc >= 0.0 {
            let dx = disc.sqrt() / (2.0 * a.abs());
            let mut x1 = xe - dx;
            let x2 = xe + dx;
            let mut roots = 0;
            if x1.abs() <= 1.0 {
                roots += 1;
            }
            if x2.abs() <= 1.0 {
                roots += 1;
            }
            if x1 < -1.0 {
                x1 = x2;
            }

            if roots == 1 {
                if h0 < 0.0 {
                    rise_hour.get_or_insert(i + x1);
                } else {
                    set_hour.get_or_insert(i + x1);
                }
            } else if roots == 2 {
                let (r, s) = if ye < 0.0 { (x2, x1) } else { (x1, x2) };
                rise_hour.get_or_insert(i + r);
                set_hour.get_or_insert(i + s);
            }
        }

        h0 = h2;
        i += 2.0;
    }

    let at_hour = |hours: f64| *start + Duration::milliseconds((hours * 3_600_000.0).round() as i64);
    // a crossing interpolated onto the very end of the window belongs to
    // the next day
    MoonTimes {
        rise: rise_hour.filter(|h| *h < 24.0).map(at_hour),
        set: set_hour.filter(|h| *h < 24.0).map(at_hour),
        transit: best_transit.map(|(h, _)| at_hour(h)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_events_fall_inside_the_window() {
        let start = utc("2024-03-10T00:00:00Z");
        let location = Location::new(48.2, 16.4).unwrap();
        let times = moon_times(&start, &location);
        let end = start + Duration::hours(24);
        for event in [times.rise, times.set, times.transit].into_iter().flatten() {
            assert!(
                event >= start && event < end,
                "event {event} outside [{start}, {end})"
            );
        }
    }

    #[test]
    fn test_transit_is_the_sampled_maximum() {
        let start = utc("2024-06-01T00:00:00Z");
        let location = Location::new(35.0, -120.0).unwrap();
        let times = moon_times(&start, &location);
        let transit = times.transit.expect("transit always exists");

        let transit_alt = moon_position(&transit, &location).altitude_deg;
        for h in 0..24 {
            let t = start + Duration::hours(h);
            let alt = moon_position(&t, &location).altitude_deg;
            assert!(
                alt <= transit_alt + 0.5,
                "hour {h}: altitude {alt}° exceeds transit altitude {transit_alt}°"
            );
        }
    }

    #[test]
    fn test_mid_latitude_day_has_rise_and_set() {
        // At 48°N the moon crosses the horizon nearly every day; scan a week
        // and require both events on most days.
        let location = Location::new(48.2, 16.4).unwrap();
        let mut both = 0;
        for day in 0..7 {
            let start = utc("2024-03-10T00:00:00Z") + Duration::days(day);
            let times = moon_times(&start, &location);
            if times.rise.is_some() && times.set.is_some() {
                both += 1;
            }
        }
        assert!(both >= 5, "expected rise+set on most days, got {both}/7");
    }
}
