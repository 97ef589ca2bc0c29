//! Compact solar position model
//!
//! Only as much of the sun as the lunar illumination geometry needs: mean
//! anomaly, equation of center, apparent ecliptic longitude, RA/dec.

use std::f64::consts::PI;

use super::{declination, right_ascension, EquatorialCoords};

/// Mean Earth-Sun distance in kilometers.
pub(crate) const SUN_DISTANCE_KM: f64 = 149_598_000.0;

fn solar_mean_anomaly(days: f64) -> f64 {
    (357.5291 + 0.985_600_28 * days).to_radians()
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    // equation of center
    let c = (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()).to_radians();
    // perihelion of the Earth
    let p = 102.9372_f64.to_radians();
    m + c + p + PI
}

/// Geocentric equatorial coordinates of the sun for days since J2000
pub(crate) fn sun_coords(days: f64) -> EquatorialCoords {
    let l = ecliptic_longitude(solar_mean_anomaly(days));
    EquatorialCoords {
        ra: right_ascension(l, 0.0),
        dec: declination(l, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declination_bounds_over_a_year() {
        // Solar declination stays within the obliquity band
        for day in 0..366 {
            let c = sun_coords(day as f64);
            let dec_deg = c.dec.to_degrees();
            assert!(
                dec_deg.abs() < 23.5,
                "day {day}: declination {dec_deg}° outside obliquity band"
            );
        }
    }

    #[test]
    fn test_equinox_declination_near_zero() {
        // 2024-03-20 ≈ 8845 days after J2000
        let c = sun_coords(8845.0);
        assert!(
            c.dec.to_degrees().abs() < 1.0,
            "equinox declination should be near zero, got {}°",
            c.dec.to_degrees()
        );
    }
}
