//! Inbound configuration: observer location, locale and card options

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::moon::MoonDataKey;

/// Observer coordinates in degrees. Validated on construction so the
/// computation layer never sees NaN or out-of-range values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidLongitude(longitude));
        }
        Ok(Location {
            latitude,
            longitude,
        })
    }
}

/// Clock style for formatted times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    Hour12,
    #[default]
    #[serde(rename = "24h")]
    Hour24,
}

/// Language and number/time formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardLocale {
    /// BCP-47 style language tag, e.g. "en" or "de-AT"
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub time_format: TimeFormat,
    /// Decimal places for numeric display values
    #[serde(default = "default_decimals")]
    pub number_decimals: u8,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_decimals() -> u8 {
    1
}

impl Default for CardLocale {
    fn default() -> Self {
        CardLocale {
            language: default_language(),
            time_format: TimeFormat::default(),
            number_decimals: default_decimals(),
        }
    }
}

/// Card-level display options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardConfig {
    /// Display distances in miles instead of kilometers
    #[serde(default)]
    pub mile_unit: bool,
    /// Mirror the phase illustration for southern-hemisphere observers
    #[serde(default)]
    pub southern_hemisphere: bool,
    /// Data items excluded from `visible_items`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_items: Vec<MoonDataKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_rejects_nan() {
        assert!(Location::new(f64::NAN, 0.0).is_err());
        assert!(Location::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_location_rejects_out_of_range() {
        assert!(Location::new(91.0, 0.0).is_err());
        assert!(Location::new(-90.5, 0.0).is_err());
        assert!(Location::new(0.0, 181.0).is_err());
        assert!(Location::new(0.0, -200.0).is_err());
        assert!(Location::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: CardConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.mile_unit);
        assert!(!config.southern_hemisphere);
        assert!(config.hidden_items.is_empty());

        let locale: CardLocale = serde_json::from_str(r#"{"time_format":"12h"}"#).unwrap();
        assert_eq!(locale.language, "en");
        assert_eq!(locale.time_format, TimeFormat::Hour12);
        assert_eq!(locale.number_decimals, 1);
    }
}
