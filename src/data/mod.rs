//! Core data models for Hello Weather
//!
//! This module contains the location and forecast types shared by the API
//! clients, the series pipeline and the UI, plus the clients themselves.

pub mod geocoding;
pub mod service;
pub mod timezone;
pub mod weather;

pub use geocoding::{GeocodeError, GeocodedPlace, GeocodingClient};
pub use service::{LoadedForecast, LookupError, LookupTarget, WeatherService};
pub use timezone::{TimezoneClient, TimezoneError};
pub use weather::{weather_code_to_condition, WeatherClient, WeatherError};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A point on the globe with validated coordinates
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
/// Deserialization runs the same validation, so a hand-edited settings file
/// cannot smuggle in an out-of-range location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = String;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(raw.latitude, raw.longitude).ok_or_else(|| {
            format!(
                "coordinates out of range: {}, {}",
                raw.latitude, raw.longitude
            )
        })
    }
}

impl Location {
    /// Creates a location, returning `None` for non-finite or out-of-range coordinates
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Short human-readable form, e.g. "52.5200, 13.4050"
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Types of weather conditions derived from WMO weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    FreezingRain,
    Thunderstorm,
    Snow,
    Fog,
}

impl WeatherCondition {
    /// Short description used in the forecast table
    pub fn description(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::FreezingRain => "Freezing rain",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Fog => "Fog",
        }
    }
}

/// Numeric hourly measurements that can be read out of an `HourlySeries`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyField {
    /// Air temperature at 2 m, °C
    Temperature,
    /// Precipitation amount, mm
    Precipitation,
    /// Precipitation probability, %
    PrecipitationProbability,
    /// Total cloud cover, %
    CloudCover,
    /// Wind speed at 10 m, m/s
    WindSpeed,
    /// Wind direction at 10 m, degrees
    WindDirection,
    /// Relative humidity at 2 m, %
    Humidity,
    /// Direct solar radiation, W/m²
    SolarRadiation,
    /// Snowfall, cm
    Snowfall,
}

/// Hourly forecast series sharing one time axis
///
/// Times are naive timestamps in the location's local timezone, exactly as the
/// weather API returns them with `timezone=auto`. Every value vector has the
/// same length as `time`; a `None` marks a value the API did not provide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<NaiveDateTime>,
    pub temperature: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub cloud_cover: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
    pub wind_direction: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub solar_radiation: Vec<Option<f64>>,
    pub snowfall: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u8>>,
}

impl HourlySeries {
    /// Number of hourly entries
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the series has no entries
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns the raw column for a field
    pub fn column(&self, field: HourlyField) -> &[Option<f64>] {
        match field {
            HourlyField::Temperature => &self.temperature,
            HourlyField::Precipitation => &self.precipitation,
            HourlyField::PrecipitationProbability => &self.precipitation_probability,
            HourlyField::CloudCover => &self.cloud_cover,
            HourlyField::WindSpeed => &self.wind_speed,
            HourlyField::WindDirection => &self.wind_direction,
            HourlyField::Humidity => &self.humidity,
            HourlyField::SolarRadiation => &self.solar_radiation,
            HourlyField::Snowfall => &self.snowfall,
        }
    }

    /// Value at `index` for display purposes; missing values read as zero
    pub fn value_at(&self, field: HourlyField, index: usize) -> f64 {
        value_or_zero(self.column(field), index)
    }

    /// Pads or truncates every column to the length of the time axis
    pub fn normalize(&mut self) {
        let len = self.time.len();
        for (name, column) in [
            ("temperature", &mut self.temperature),
            ("precipitation", &mut self.precipitation),
            ("precipitation_probability", &mut self.precipitation_probability),
            ("cloud_cover", &mut self.cloud_cover),
            ("wind_speed", &mut self.wind_speed),
            ("wind_direction", &mut self.wind_direction),
            ("humidity", &mut self.humidity),
            ("solar_radiation", &mut self.solar_radiation),
            ("snowfall", &mut self.snowfall),
        ] {
            fit_to_len(name, column, len);
        }
        fit_to_len("weather_code", &mut self.weather_code, len);
    }
}

/// Daily forecast aggregates sharing one date axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub temperature_mean: Vec<Option<f64>>,
    pub temperature_max: Vec<Option<f64>>,
    pub temperature_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub precipitation_probability_mean: Vec<Option<f64>>,
    pub wind_speed_max: Vec<Option<f64>>,
    pub wind_direction_dominant: Vec<Option<f64>>,
    pub cloud_cover_mean: Vec<Option<f64>>,
    pub snowfall_sum: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u8>>,
}

impl DailySeries {
    /// Number of days
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the series has no days
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Pads or truncates every column to the length of the date axis
    pub fn normalize(&mut self) {
        let len = self.time.len();
        for (name, column) in [
            ("temperature_mean", &mut self.temperature_mean),
            ("temperature_max", &mut self.temperature_max),
            ("temperature_min", &mut self.temperature_min),
            ("precipitation_sum", &mut self.precipitation_sum),
            (
                "precipitation_probability_mean",
                &mut self.precipitation_probability_mean,
            ),
            ("wind_speed_max", &mut self.wind_speed_max),
            ("wind_direction_dominant", &mut self.wind_direction_dominant),
            ("cloud_cover_mean", &mut self.cloud_cover_mean),
            ("snowfall_sum", &mut self.snowfall_sum),
        ] {
            fit_to_len(name, column, len);
        }
        fit_to_len("weather_code", &mut self.weather_code, len);
    }
}

/// A complete forecast for one location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Timezone label declared by the weather API (e.g. "Europe/Berlin")
    pub timezone: String,
    /// UTC offset of the location at fetch time, in seconds
    pub utc_offset_seconds: i32,
    /// Hourly series
    pub hourly: HourlySeries,
    /// Daily series
    pub daily: DailySeries,
}

/// Reads a possibly-missing value, defaulting to zero
pub fn value_or_zero(column: &[Option<f64>], index: usize) -> f64 {
    column.get(index).copied().flatten().unwrap_or(0.0)
}

fn fit_to_len<T>(name: &str, column: &mut Vec<Option<T>>, len: usize) {
    if column.len() > len {
        tracing::warn!(
            "Series {} has {} values for {} timestamps, truncating",
            name,
            column.len(),
            len
        );
    }
    column.resize_with(len, || None);
}
