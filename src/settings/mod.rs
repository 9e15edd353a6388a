//! User preferences persisted between sessions
//!
//! Preferences are one JSON document read and written as a whole. Field names
//! are camelCase so the file stays readable and stable across versions; any
//! missing field takes its default.

mod store;

pub use store::SettingsStore;

use serde::{Deserialize, Serialize};

use crate::chart::SeriesVisibility;
use crate::data::Location;

/// Temperature unit used for display
///
/// Forecasts are always fetched and classified in °C; this only affects what
/// the user sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Units {
    /// Convert a Celsius value into this unit
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            Units::Celsius => celsius,
            Units::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Celsius => "°C",
            Units::Fahrenheit => "°F",
        }
    }

    /// The other unit
    pub fn toggled(&self) -> Self {
        match self {
            Units::Celsius => Units::Fahrenheit,
            Units::Fahrenheit => Units::Celsius,
        }
    }
}

/// Everything the app remembers between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub dark_mode: bool,
    /// Last successfully loaded location
    pub coordinates: Option<Location>,
    /// Name shown for `coordinates`
    pub city_name: String,
    pub chart_visibility: SeriesVisibility,
    pub map_visible: bool,
    pub units: Units,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            coordinates: None,
            city_name: String::new(),
            chart_visibility: SeriesVisibility::default(),
            map_visible: true,
            units: Units::Celsius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = UserPreferences::default();
        assert!(!prefs.dark_mode);
        assert!(prefs.coordinates.is_none());
        assert!(prefs.city_name.is_empty());
        assert!(prefs.map_visible);
        assert_eq!(prefs.units, Units::Celsius);
        assert_eq!(prefs.chart_visibility, SeriesVisibility::default());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"darkMode": true, "cityName": "Hamburg"}"#).unwrap();
        assert!(prefs.dark_mode);
        assert_eq!(prefs.city_name, "Hamburg");
        // mapVisible absent means visible
        assert!(prefs.map_visible);
        assert_eq!(prefs.units, Units::Celsius);
    }

    #[test]
    fn test_camel_case_keys() {
        let prefs = UserPreferences {
            coordinates: Location::new(53.55, 9.99),
            ..Default::default()
        };
        let json = serde_json::to_value(&prefs).unwrap();

        assert_eq!(json["darkMode"], false);
        assert_eq!(json["mapVisible"], true);
        assert_eq!(json["units"], "celsius");
        assert_eq!(json["coordinates"]["latitude"], 53.55);
        assert_eq!(json["chartVisibility"]["temperature"], true);
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Units::Celsius.convert(21.5), 21.5);
        assert_eq!(Units::Fahrenheit.convert(0.0), 32.0);
        assert_eq!(Units::Fahrenheit.convert(-40.0), -40.0);
        assert_eq!(Units::Fahrenheit.convert(100.0), 212.0);
        assert_eq!(Units::Celsius.toggled(), Units::Fahrenheit);
        assert_eq!(Units::Fahrenheit.symbol(), "°F");
    }
}
