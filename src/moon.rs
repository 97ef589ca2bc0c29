//! Moon facade
//!
//! `Moon` shapes one instant's astronomical data into named, localized,
//! unit-aware display items and chart-ready series. An instance is a value:
//! constructed once per `(instant, location, locale, config)`, read-only
//! afterwards, and simply replaced when the host refreshes.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::astro::{self, MoonEphemeris, MoonIllumination, MoonPosition, MoonTimes};
use crate::config::{CardConfig, CardLocale, Location};
use crate::error::Error;
use crate::format::{
    cardinal_direction, create_item, format_number, format_time, km_to_miles, relative_time,
    MoonDataItem,
};
use crate::i18n::translate;
use crate::series::AltitudeSeries;

/// Number of phase illustrations in the sprite strip.
const IMAGE_BUCKETS: usize = 31;

/// Keys of the display record, one per named fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoonDataKey {
    Illumination,
    Age,
    MoonRise,
    MoonSet,
    MoonHigh,
    Distance,
    Azimuth,
    Altitude,
    NextFullMoon,
    NextNewMoon,
    Direction,
    Horizon,
}

impl MoonDataKey {
    pub const ALL: [MoonDataKey; 12] = [
        MoonDataKey::Illumination,
        MoonDataKey::Age,
        MoonDataKey::MoonRise,
        MoonDataKey::MoonSet,
        MoonDataKey::MoonHigh,
        MoonDataKey::Distance,
        MoonDataKey::Azimuth,
        MoonDataKey::Altitude,
        MoonDataKey::NextFullMoon,
        MoonDataKey::NextNewMoon,
        MoonDataKey::Direction,
        MoonDataKey::Horizon,
    ];
}

/// The full display record. Every key from [`MoonDataKey`] is present;
/// hidden-item filtering happens in [`Moon::visible_items`].
#[derive(Debug, Clone, Serialize)]
pub struct MoonData {
    pub illumination: MoonDataItem,
    pub age: MoonDataItem,
    pub moon_rise: MoonDataItem,
    pub moon_set: MoonDataItem,
    pub moon_high: MoonDataItem,
    pub distance: MoonDataItem,
    pub azimuth: MoonDataItem,
    pub altitude: MoonDataItem,
    pub next_full_moon: MoonDataItem,
    pub next_new_moon: MoonDataItem,
    pub direction: MoonDataItem,
    pub horizon: MoonDataItem,
}

impl MoonData {
    pub fn get(&self, key: MoonDataKey) -> &MoonDataItem {
        match key {
            MoonDataKey::Illumination => &self.illumination,
            MoonDataKey::Age => &self.age,
            MoonDataKey::MoonRise => &self.moon_rise,
            MoonDataKey::MoonSet => &self.moon_set,
            MoonDataKey::MoonHigh => &self.moon_high,
            MoonDataKey::Distance => &self.distance,
            MoonDataKey::Azimuth => &self.azimuth,
            MoonDataKey::Altitude => &self.altitude,
            MoonDataKey::NextFullMoon => &self.next_full_moon,
            MoonDataKey::NextNewMoon => &self.next_new_moon,
            MoonDataKey::Direction => &self.direction,
            MoonDataKey::Horizon => &self.horizon,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoonDataKey, &MoonDataItem)> {
        MoonDataKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

/// Which phase illustration to draw and how to orient it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoonImage {
    /// Index into the 31-image sprite strip
    pub index: usize,
    /// Rotation of the terminator as seen by the observer, degrees
    pub rotation_deg: f64,
    /// Mirror horizontally for southern-hemisphere observers
    pub mirrored: bool,
}

/// Rise/set positions snapped onto series indices, so chart glyphs align
/// with sample positions instead of interpolating between them.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeMarkers {
    pub rise_index: Option<usize>,
    pub set_index: Option<usize>,
}

/// One instant's moon, shaped for display.
pub struct Moon {
    instant: DateTime<FixedOffset>,
    location: Location,
    locale: CardLocale,
    config: CardConfig,
    ephemeris: MoonEphemeris,
    data: MoonData,
}

impl Moon {
    /// Compute the full record for an instant and observer.
    ///
    /// The instant's fixed offset defines the local day window for the
    /// rise/set search and the timezone of every formatted time.
    ///
    /// # Errors
    /// Fails fast on non-finite or out-of-range coordinates; it will not
    /// silently produce NaN-valued display items.
    pub fn new(
        instant: DateTime<FixedOffset>,
        latitude: f64,
        longitude: f64,
        locale: CardLocale,
        config: CardConfig,
    ) -> Result<Self, Error> {
        let location = Location::new(latitude, longitude)?;
        let day_start = start_of_day(&instant);
        let ephemeris = astro::moon_ephemeris(
            &instant.with_timezone(&Utc),
            &day_start.with_timezone(&Utc),
            &location,
        );
        debug!(
            latitude,
            longitude,
            phase = ?ephemeris.illumination.phase,
            fraction = ephemeris.illumination.fraction,
            "computed lunar ephemeris"
        );

        let data = build_data(&instant, &ephemeris, &locale, &config);
        Ok(Moon {
            instant,
            location,
            locale,
            config,
            ephemeris,
            data,
        })
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn illumination(&self) -> &MoonIllumination {
        &self.ephemeris.illumination
    }

    pub fn position(&self) -> &MoonPosition {
        &self.ephemeris.position
    }

    pub fn times(&self) -> &MoonTimes {
        &self.ephemeris.times
    }

    /// Localized name of the current phase.
    pub fn phase_name(&self) -> String {
        translate(
            &self.locale.language,
            self.ephemeris.illumination.phase.label_key(),
        )
    }

    /// Phase illustration descriptor.
    pub fn moon_image(&self) -> MoonImage {
        MoonImage {
            index: image_index(self.ephemeris.illumination.phase_value),
            rotation_deg: self.ephemeris.limb_rotation_deg,
            mirrored: self.config.southern_hemisphere,
        }
    }

    /// The full display record.
    pub fn moon_data(&self) -> &MoonData {
        &self.data
    }

    /// The display record minus the keys hidden by configuration.
    pub fn visible_items(&self) -> Vec<(MoonDataKey, &MoonDataItem)> {
        self.data
            .iter()
            .filter(|(key, _)| !self.config.hidden_items.contains(key))
            .collect()
    }

    /// The default chart series: 24 hourly samples across the local day.
    pub fn altitude_series(&self) -> Result<AltitudeSeries, Error> {
        AltitudeSeries::sample(start_of_day(&self.instant), 60, 24, &self.location)
    }

    /// A custom-resolution series; `count` stays explicitly bounded.
    pub fn altitude_series_with(
        &self,
        start: DateTime<FixedOffset>,
        step_minutes: i64,
        count: usize,
    ) -> Result<AltitudeSeries, Error> {
        AltitudeSeries::sample(start, step_minutes, count, &self.location)
    }

    /// Index of the sample nearest the facade's instant: the "where is the
    /// moon right now" pointer for chart markers.
    pub fn current_index(&self, series: &AltitudeSeries) -> Option<usize> {
        series.nearest_index(&self.instant)
    }

    /// Rise/set snapped onto their nearest series indices.
    pub fn time_markers(&self, series: &AltitudeSeries) -> TimeMarkers {
        let offset = *self.instant.offset();
        let snap = |event: Option<DateTime<Utc>>| {
            event.and_then(|t| series.nearest_index(&t.with_timezone(&offset)))
        };
        TimeMarkers {
            rise_index: snap(self.ephemeris.times.rise),
            set_index: snap(self.ephemeris.times.set),
        }
    }
}

/// Sprite-strip index for a phase value.
///
/// The phase value invariant keeps the index in range; a middle-strip
/// fallback covers the impossible out-of-range case anyway.
pub(crate) fn image_index(phase_value: f64) -> usize {
    if (0.0..1.0).contains(&phase_value) {
        (phase_value * IMAGE_BUCKETS as f64).floor() as usize % IMAGE_BUCKETS
    } else {
        IMAGE_BUCKETS / 2
    }
}

/// Midnight of the instant's civil day, in the instant's own offset.
fn start_of_day(instant: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let since_midnight = instant.time().signed_duration_since(NaiveTime::MIN);
    *instant - since_midnight
}

fn build_data(
    instant: &DateTime<FixedOffset>,
    ephemeris: &MoonEphemeris,
    locale: &CardLocale,
    config: &CardConfig,
) -> MoonData {
    let lang = locale.language.as_str();
    let decimals = locale.number_decimals;
    let offset = *instant.offset();

    let event_item = |label_key: &str, event: Option<DateTime<Utc>>| match event {
        Some(t) => {
            let local = t.with_timezone(&offset);
            create_item(
                lang,
                label_key,
                format_time(&local, locale),
                relative_time(&local, instant, lang),
            )
        }
        None => create_item(lang, label_key, translate(lang, "state.no_event"), None),
    };

    let (distance_value, distance_unit) = if config.mile_unit {
        (
            km_to_miles(ephemeris.position.distance_km, true),
            translate(lang, "unit.mi"),
        )
    } else {
        (ephemeris.position.distance_km, translate(lang, "unit.km"))
    };

    let horizon_state = if ephemeris.position.altitude_deg >= 0.0 {
        "state.over_horizon"
    } else {
        "state.under_horizon"
    };

    MoonData {
        illumination: create_item(
            lang,
            "item.illumination",
            format!(
                "{}%",
                format_number(ephemeris.illumination.fraction * 100.0, decimals)
            ),
            Some(translate(lang, ephemeris.illumination.phase.label_key())),
        ),
        age: create_item(
            lang,
            "item.age",
            format!(
                "{} {}",
                format_number(ephemeris.age_days, decimals),
                translate(lang, "unit.days")
            ),
            None,
        ),
        moon_rise: event_item("item.moon_rise", ephemeris.times.rise),
        moon_set: event_item("item.moon_set", ephemeris.times.set),
        moon_high: event_item("item.moon_high", ephemeris.times.transit),
        distance: create_item(
            lang,
            "item.distance",
            format!(
                "{} {}",
                format_number(distance_value, decimals),
                distance_unit
            ),
            None,
        ),
        azimuth: create_item(
            lang,
            "item.azimuth",
            format!(
                "{}\u{b0}",
                format_number(ephemeris.position.azimuth_deg, decimals)
            ),
            Some(cardinal_direction(ephemeris.position.azimuth_deg).to_string()),
        ),
        altitude: create_item(
            lang,
            "item.altitude",
            format!(
                "{}\u{b0}",
                format_number(ephemeris.position.altitude_deg, decimals)
            ),
            None,
        ),
        next_full_moon: create_item(
            lang,
            "item.next_full_moon",
            ephemeris
                .next_full_moon
                .with_timezone(&offset)
                .format("%Y-%m-%d")
                .to_string(),
            None,
        ),
        next_new_moon: create_item(
            lang,
            "item.next_new_moon",
            ephemeris
                .next_new_moon
                .with_timezone(&offset)
                .format("%Y-%m-%d")
                .to_string(),
            None,
        ),
        direction: create_item(
            lang,
            "item.direction",
            cardinal_direction(ephemeris.position.azimuth_deg).to_string(),
            None,
        ),
        horizon: create_item(lang, "item.horizon", translate(lang, horizon_state), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moon_at(s: &str) -> Moon {
        Moon::new(
            DateTime::parse_from_rfc3339(s).unwrap(),
            50.66,
            14.04,
            CardLocale::default(),
            CardConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_coordinates() {
        let instant = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let err = Moon::new(
            instant,
            f64::NAN,
            14.04,
            CardLocale::default(),
            CardConfig::default(),
        );
        assert!(matches!(err, Err(Error::InvalidLatitude(_))));
    }

    #[test]
    fn test_start_of_day_respects_offset() {
        let instant = DateTime::parse_from_rfc3339("2024-06-15T01:30:00+02:00").unwrap();
        let start = start_of_day(&instant);
        assert_eq!(start.to_rfc3339(), "2024-06-15T00:00:00+02:00");
    }

    #[test]
    fn test_image_index_tracks_phase() {
        let moon = moon_at("2024-01-01T00:00:00Z");
        let image = moon.moon_image();
        let expected =
            (moon.illumination().phase_value * IMAGE_BUCKETS as f64).floor() as usize;
        assert_eq!(image.index, expected);
        assert!(image.index < IMAGE_BUCKETS);
        assert!(!image.mirrored);
    }

    #[test]
    fn test_southern_hemisphere_mirrors_image() {
        let instant = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let moon = Moon::new(
            instant,
            -33.87,
            151.21,
            CardLocale::default(),
            CardConfig {
                southern_hemisphere: true,
                ..CardConfig::default()
            },
        )
        .unwrap();
        assert!(moon.moon_image().mirrored);
    }

    #[test]
    fn test_hidden_items_are_filtered() {
        let instant = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let moon = Moon::new(
            instant,
            50.66,
            14.04,
            CardLocale::default(),
            CardConfig {
                hidden_items: vec![MoonDataKey::Azimuth, MoonDataKey::Altitude],
                ..CardConfig::default()
            },
        )
        .unwrap();
        let visible = moon.visible_items();
        assert_eq!(visible.len(), MoonDataKey::ALL.len() - 2);
        assert!(visible.iter().all(|(key, _)| *key != MoonDataKey::Azimuth));
    }

    #[test]
    fn test_data_record_is_complete() {
        let moon = moon_at("2024-01-01T12:00:00+01:00");
        for (_, item) in moon.moon_data().iter() {
            assert!(!item.label.is_empty());
            assert!(!item.value.is_empty());
        }
    }
}
