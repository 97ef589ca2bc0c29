//! Lunar position and illumination
//!
//! Compact geocentric ecliptic model of the moon (mean longitude, mean
//! anomaly, argument of latitude with first-order perturbation terms),
//! horizontal coordinates with topocentric parallax, and the sun-moon-earth
//! illumination geometry.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::sun::{sun_coords, SUN_DISTANCE_KM};
use super::time::{sidereal_time, to_days, MILLIS_PER_DAY, SYNODIC_MONTH_DAYS};
use super::{altitude, azimuth, declination, right_ascension, EquatorialCoords};
use crate::config::Location;

/// Mean equatorial radius of the Earth in kilometers.
const EARTH_RADIUS_KM: f64 = 6_378.14;

/// Geocentric lunar coordinates in radians plus distance in kilometers.
pub(crate) struct MoonCoords {
    pub ra: f64,
    pub dec: f64,
    pub distance_km: f64,
}

/// Geocentric ecliptic coordinates of the moon for days since J2000
pub(crate) fn moon_coords(days: f64) -> MoonCoords {
    let l = (218.316 + 13.176_396 * days).to_radians(); // mean longitude
    let m = (134.963 + 13.064_993 * days).to_radians(); // mean anomaly
    let f = (93.272 + 13.229_350 * days).to_radians(); // mean distance argument

    let lon = l + (6.289 * m.sin()).to_radians();
    let lat = (5.128 * f.sin()).to_radians();
    let distance_km = 385_001.0 - 20_905.0 * m.cos();

    MoonCoords {
        ra: right_ascension(lon, lat),
        dec: declination(lon, lat),
        distance_km,
    }
}

/// Topocentric position of the moon as seen by an observer.
///
/// Azimuth is measured from north, clockwise, in `[0, 360)`. Altitude is
/// corrected for the moon's horizontal parallax, which at ~57' is far from
/// negligible (stars and sun get away without it).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoonPosition {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
    pub distance_km: f64,
    pub parallactic_angle_deg: f64,
}

/// Compute the moon's topocentric position.
///
/// # Arguments
/// * `date` - UTC instant
/// * `location` - observer latitude/longitude in degrees
pub fn moon_position(date: &DateTime<Utc>, location: &Location) -> MoonPosition {
    let days = to_days(date);
    let c = moon_coords(days);
    let phi = location.latitude.to_radians();
    let hour_angle = sidereal_time(days, location.longitude.to_radians()) - c.ra;

    let mut h = altitude(hour_angle, phi, c.dec);
    let pa = hour_angle
        .sin()
        .atan2(phi.tan() * c.dec.cos() - c.dec.sin() * hour_angle.cos());

    // topocentric parallax in altitude
    h -= (EARTH_RADIUS_KM / c.distance_km).asin() * h.cos();

    MoonPosition {
        azimuth_deg: (azimuth(hour_angle, phi, c.dec).to_degrees() + 180.0).rem_euclid(360.0),
        altitude_deg: h.to_degrees(),
        distance_km: c.distance_km,
        parallactic_angle_deg: pa.to_degrees(),
    }
}

/// The eight canonical phases, bucketed from the continuous phase value
/// with fixed 1/8-cycle windows centered on the principal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Bucket a phase value in `[0, 1)` into one of the eight phases.
    pub fn from_phase_value(phase_value: f64) -> Self {
        const PHASES: [MoonPhase; 8] = [
            MoonPhase::NewMoon,
            MoonPhase::WaxingCrescent,
            MoonPhase::FirstQuarter,
            MoonPhase::WaxingGibbous,
            MoonPhase::FullMoon,
            MoonPhase::WaningGibbous,
            MoonPhase::LastQuarter,
            MoonPhase::WaningCrescent,
        ];
        let bucket = (phase_value.rem_euclid(1.0) * 8.0).round() as usize % 8;
        PHASES[bucket]
    }

    /// Dotted translation key for the phase name.
    pub fn label_key(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "phase.new_moon",
            MoonPhase::WaxingCrescent => "phase.waxing_crescent",
            MoonPhase::FirstQuarter => "phase.first_quarter",
            MoonPhase::WaxingGibbous => "phase.waxing_gibbous",
            MoonPhase::FullMoon => "phase.full_moon",
            MoonPhase::WaningGibbous => "phase.waning_gibbous",
            MoonPhase::LastQuarter => "phase.last_quarter",
            MoonPhase::WaningCrescent => "phase.waning_crescent",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "\u{1F311}",
            MoonPhase::WaxingCrescent => "\u{1F312}",
            MoonPhase::FirstQuarter => "\u{1F313}",
            MoonPhase::WaxingGibbous => "\u{1F314}",
            MoonPhase::FullMoon => "\u{1F315}",
            MoonPhase::WaningGibbous => "\u{1F316}",
            MoonPhase::LastQuarter => "\u{1F317}",
            MoonPhase::WaningCrescent => "\u{1F318}",
        }
    }
}

/// Illumination state of the lunar disk.
///
/// `phase_value` is the fraction of the synodic cycle elapsed: 0 is new,
/// 0.5 is full, always in `[0, 1)`. `limb_angle_deg` is the position angle
/// of the bright limb's midpoint against celestial north.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoonIllumination {
    pub fraction: f64,
    pub phase_value: f64,
    pub phase_angle_deg: f64,
    pub limb_angle_deg: f64,
    pub phase: MoonPhase,
}

/// Compute illumination fraction and phase from sun-moon-earth geometry.
pub fn moon_illumination(date: &DateTime<Utc>) -> MoonIllumination {
    let days = to_days(date);
    let s = sun_coords(days);
    let m = moon_coords(days);

    let (phase_angle, limb_angle) = phase_geometry(&s, &m);
    let phase_value = (0.5 + 0.5 * phase_angle * limb_angle.signum() / PI).rem_euclid(1.0);

    MoonIllumination {
        fraction: (1.0 + phase_angle.cos()) / 2.0,
        phase_value,
        phase_angle_deg: phase_angle.to_degrees(),
        limb_angle_deg: limb_angle.to_degrees(),
        phase: MoonPhase::from_phase_value(phase_value),
    }
}

/// Phase angle and bright-limb position angle, both in radians.
fn phase_geometry(sun: &EquatorialCoords, moon: &MoonCoords) -> (f64, f64) {
    // geocentric elongation via spherical angular separation
    let elongation = (sun.dec.sin() * moon.dec.sin()
        + sun.dec.cos() * moon.dec.cos() * (sun.ra - moon.ra).cos())
    .clamp(-1.0, 1.0)
    .acos();

    // the sun is far enough away that the phase angle needs the distance ratio
    let phase_angle = (SUN_DISTANCE_KM * elongation.sin())
        .atan2(moon.distance_km - SUN_DISTANCE_KM * elongation.cos());

    let limb_angle = (sun.dec.cos() * (sun.ra - moon.ra).sin()).atan2(
        sun.dec.sin() * moon.dec.cos() - sun.dec.cos() * moon.dec.sin() * (sun.ra - moon.ra).cos(),
    );

    (phase_angle, limb_angle)
}

/// Age of the moon in days since new, derived from the phase value.
#[inline]
pub fn moon_age_days(phase_value: f64) -> f64 {
    phase_value.rem_euclid(1.0) * SYNODIC_MONTH_DAYS
}

/// First instant at or after `date` where the phase value reaches `target`,
/// by proportional projection along the mean synodic month.
pub fn next_phase_date(date: &DateTime<Utc>, phase_value: f64, target: f64) -> DateTime<Utc> {
    let remaining = (target - phase_value).rem_euclid(1.0);
    let millis = remaining * SYNODIC_MONTH_DAYS * MILLIS_PER_DAY;
    *date + Duration::milliseconds(millis.round() as i64)
}

/// Convenience aggregate of one instant's lunar quantities.
pub struct MoonEphemeris {
    pub illumination: MoonIllumination,
    pub position: MoonPosition,
    pub times: super::MoonTimes,
    /// Rotation of the terminator as the observer sees it, degrees
    /// (bright-limb angle minus parallactic angle). Display-only.
    pub limb_rotation_deg: f64,
    pub age_days: f64,
    pub next_full_moon: DateTime<Utc>,
    pub next_new_moon: DateTime<Utc>,
}

/// Bundle illumination, position and day events for one instant.
///
/// # Arguments
/// * `date` - UTC instant
/// * `day_start` - start of the local day whose 24 h window bounds the
///   rise/set/transit search
/// * `location` - observer latitude/longitude in degrees
pub fn moon_ephemeris(
    date: &DateTime<Utc>,
    day_start: &DateTime<Utc>,
    location: &Location,
) -> MoonEphemeris {
    let illumination = moon_illumination(date);
    let position = moon_position(date, location);
    let times = super::moon_times(day_start, location);

    MoonEphemeris {
        limb_rotation_deg: illumination.limb_angle_deg - position.parallactic_angle_deg,
        age_days: moon_age_days(illumination.phase_value),
        next_full_moon: next_phase_date(date, illumination.phase_value, 0.5),
        next_new_moon: next_phase_date(date, illumination.phase_value, 0.0),
        illumination,
        position,
        times,
    }
}
