//! Formatting adapter
//!
//! Turns raw numeric and time values into locale- and unit-correct display
//! strings. Conversions happen here and only here; the computation layers
//! never round or convert units.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::config::{CardLocale, TimeFormat};
use crate::i18n::translate;

/// Kilometers per statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

/// One display-ready fact: a localized label, a formatted value and an
/// optional annotation (relative time, compass direction).
#[derive(Debug, Clone, Serialize)]
pub struct MoonDataItem {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_value: Option<String>,
}

/// Compose a [`MoonDataItem`], resolving the label through the bundles.
pub fn create_item(
    language: &str,
    label_key: &str,
    value: String,
    second_value: Option<String>,
) -> MoonDataItem {
    MoonDataItem {
        label: translate(language, label_key),
        value,
        second_value,
    }
}

/// Distance conversion, applied only at format time.
#[inline]
pub fn km_to_miles(km: f64, use_miles: bool) -> f64 {
    if use_miles {
        km / KM_PER_MILE
    } else {
        km
    }
}

/// Short time string in the locale's clock style.
pub fn format_time(time: &DateTime<FixedOffset>, locale: &CardLocale) -> String {
    match locale.time_format {
        TimeFormat::Hour12 => time.format("%-I:%M %p").to_string(),
        TimeFormat::Hour24 => time.format("%H:%M").to_string(),
    }
}

/// Fixed-precision numeric display value.
pub fn format_number(value: f64, decimals: u8) -> String {
    format!("{value:.prec$}", prec = decimals as usize)
}

/// Relative-time phrase for a signed delta against "now".
///
/// Buckets: under a minute, minutes, hours. Deltas of a day or more return
/// `None` and the caller shows the absolute time alone.
pub fn relative_time(
    target: &DateTime<FixedOffset>,
    now: &DateTime<FixedOffset>,
    language: &str,
) -> Option<String> {
    let delta = target.signed_duration_since(*now);
    let minutes = delta.num_minutes();
    let hours = delta.num_hours();

    let (key, n) = if hours.abs() >= 24 {
        return None;
    } else if hours >= 2 {
        ("relative.in_hours", hours)
    } else if hours == 1 {
        ("relative.in_hour", 1)
    } else if hours <= -2 {
        ("relative.hours_ago", -hours)
    } else if hours == -1 {
        ("relative.hour_ago", 1)
    } else if minutes >= 2 {
        ("relative.in_minutes", minutes)
    } else if minutes == 1 {
        ("relative.in_minute", 1)
    } else if minutes <= -2 {
        ("relative.minutes_ago", -minutes)
    } else if minutes == -1 {
        ("relative.minute_ago", 1)
    } else {
        ("relative.just_now", 0)
    };

    Some(translate(language, key).replace("{n}", &n.to_string()))
}

/// 16-wind compass abbreviation for an azimuth in degrees from north.
pub fn cardinal_direction(azimuth_deg: f64) -> &'static str {
    const WINDS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = (azimuth_deg.rem_euclid(360.0) / 22.5).round() as usize % 16;
    WINDS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeFormat;

    fn local(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_mile_conversion_round_trip() {
        let km = 384_400.0;
        let miles = km_to_miles(km, true);
        assert!((miles * KM_PER_MILE - km).abs() < 1e-9);
        assert_eq!(km_to_miles(km, false), km);
    }

    #[test]
    fn test_clock_styles() {
        let locale_24 = CardLocale::default();
        let locale_12 = CardLocale {
            time_format: TimeFormat::Hour12,
            ..CardLocale::default()
        };
        let evening = local("2024-01-01T18:05:00+01:00");
        assert_eq!(format_time(&evening, &locale_24), "18:05");
        assert_eq!(format_time(&evening, &locale_12), "6:05 PM");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = local("2024-01-01T12:00:00+00:00");
        let at = |s: &str| local(s);

        assert_eq!(
            relative_time(&at("2024-01-01T12:00:30+00:00"), &now, "en"),
            Some("just now".to_string())
        );
        assert_eq!(
            relative_time(&at("2024-01-01T12:10:00+00:00"), &now, "en"),
            Some("in 10 minutes".to_string())
        );
        assert_eq!(
            relative_time(&at("2024-01-01T11:15:00+00:00"), &now, "en"),
            Some("45 minutes ago".to_string())
        );
        assert_eq!(
            relative_time(&at("2024-01-01T15:30:00+00:00"), &now, "en"),
            Some("in 3 hours".to_string())
        );
        assert_eq!(
            relative_time(&at("2024-01-01T10:59:00+00:00"), &now, "en"),
            Some("1 hour ago".to_string())
        );
        // a day or more stays unlabeled
        assert_eq!(relative_time(&at("2024-01-02T12:00:00+00:00"), &now, "en"), None);
        assert_eq!(relative_time(&at("2023-12-30T12:00:00+00:00"), &now, "en"), None);
    }

    #[test]
    fn test_relative_time_localized() {
        let now = local("2024-01-01T12:00:00+00:00");
        let soon = local("2024-01-01T14:00:00+00:00");
        assert_eq!(
            relative_time(&soon, &now, "de"),
            Some("in 2 Stunden".to_string())
        );
    }

    #[test]
    fn test_cardinal_directions() {
        assert_eq!(cardinal_direction(0.0), "N");
        assert_eq!(cardinal_direction(359.9), "N");
        assert_eq!(cardinal_direction(45.0), "NE");
        assert_eq!(cardinal_direction(90.0), "E");
        assert_eq!(cardinal_direction(180.0), "S");
        assert_eq!(cardinal_direction(202.5), "SSW");
        assert_eq!(cardinal_direction(270.0), "W");
    }

    #[test]
    fn test_number_precision() {
        assert_eq!(format_number(84.567, 1), "84.6");
        assert_eq!(format_number(84.567, 0), "85");
        assert_eq!(format_number(84.0, 2), "84.00");
    }
}
