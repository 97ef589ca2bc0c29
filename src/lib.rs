// Module declarations
mod astro;
mod calendar;
mod config;
mod error;
mod format;
mod i18n;
mod moon;
mod series;

// Re-export public API
pub use astro::{
    moon_age_days, moon_ephemeris, moon_illumination, moon_position, moon_times, next_phase_date,
    MoonEphemeris, MoonIllumination, MoonPhase, MoonPosition, MoonTimes, SYNODIC_MONTH_DAYS,
};
pub use calendar::{phase_calendar, CalendarDay};
pub use config::{CardConfig, CardLocale, Location, TimeFormat};
pub use error::Error;
pub use format::{
    cardinal_direction, create_item, format_time, km_to_miles, relative_time, MoonDataItem,
    KM_PER_MILE,
};
pub use i18n::translate;
pub use moon::{Moon, MoonData, MoonDataKey, MoonImage, TimeMarkers};
pub use series::{AltitudeSample, AltitudeSeries, MAX_SERIES_SAMPLES};
