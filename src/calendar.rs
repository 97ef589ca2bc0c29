//! Month phase-calendar data
//!
//! Per-day phase information for a civil month, the data behind a calendar
//! popup: which illustration and which phase name belongs to each day.
//! Phases are evaluated at local noon so a day gets the phase it mostly
//! shows, not the one it starts with.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::astro::{moon_illumination, MoonPhase};
use crate::error::Error;
use crate::i18n::translate;
use crate::moon::image_index;

/// One day of the phase calendar.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub phase_value: f64,
    pub phase: MoonPhase,
    pub image_index: usize,
    pub phase_name: String,
}

/// Build the phase calendar for a civil month in the given UTC offset.
///
/// # Errors
/// Returns an error when `month` does not name a valid month of `year`.
pub fn phase_calendar(
    year: i32,
    month: u32,
    offset: FixedOffset,
    language: &str,
) -> Result<Vec<CalendarDay>, Error> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(Error::InvalidCalendarMonth { year, month })?;

    let mut days = Vec::with_capacity(31);
    let mut date = first;
    while date.month() == month {
        let local_noon = date.and_time(NaiveTime::MIN) + Duration::hours(12);
        let utc_noon = DateTime::<Utc>::from_naive_utc_and_offset(
            local_noon - Duration::seconds(offset.local_minus_utc() as i64),
            Utc,
        );
        let illumination = moon_illumination(&utc_noon);

        days.push(CalendarDay {
            date,
            phase_value: illumination.phase_value,
            phase: illumination.phase,
            image_index: image_index(illumination.phase_value),
            phase_name: translate(language, illumination.phase.label_key()),
        });

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    Ok(days)
}
