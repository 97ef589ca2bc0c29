//! Astronomical engine: pure, side-effect-free functions of an instant and
//! an observer location. Angles are radians internally; the public structs
//! expose degrees. Nothing in this module rounds.

mod events;
mod moon;
mod sun;
mod time;

pub use events::{moon_times, MoonTimes};
pub use moon::{
    moon_age_days, moon_ephemeris, moon_illumination, moon_position, next_phase_date,
    MoonEphemeris, MoonIllumination, MoonPhase, MoonPosition,
};
pub use time::SYNODIC_MONTH_DAYS;

/// Obliquity of the ecliptic at J2000, radians (23.4397°).
const EARTH_OBLIQUITY: f64 = 0.409_092_804_222_329;

/// Equatorial coordinates in radians.
pub(crate) struct EquatorialCoords {
    pub ra: f64,
    pub dec: f64,
}

/// Declination from ecliptic longitude/latitude
#[inline]
fn declination(lon: f64, lat: f64) -> f64 {
    let e = EARTH_OBLIQUITY;
    (lat.sin() * e.cos() + lat.cos() * e.sin() * lon.sin())
        .clamp(-1.0, 1.0)
        .asin()
}

/// Right ascension from ecliptic longitude/latitude
#[inline]
fn right_ascension(lon: f64, lat: f64) -> f64 {
    let e = EARTH_OBLIQUITY;
    (lon.sin() * e.cos() - lat.tan() * e.sin()).atan2(lon.cos())
}

/// Altitude above the horizon from hour angle, observer latitude and declination
#[inline]
fn altitude(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos())
        .clamp(-1.0, 1.0)
        .asin()
}

/// Azimuth measured from south, positive westward
#[inline]
fn azimuth(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    hour_angle
        .sin()
        .atan2(hour_angle.cos() * phi.sin() - dec.tan() * phi.cos())
}
