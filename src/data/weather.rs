//! Open-Meteo weather API client
//!
//! This module fetches hourly and daily forecast arrays from the Open-Meteo API
//! and normalizes them into our `Forecast` data structures.

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{DailySeries, Forecast, HourlySeries, Location, WeatherCondition};
use crate::config::ApiConfig;

/// Hourly variables requested from Open-Meteo
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,precipitation,cloudcover,direct_radiation,winddirection_10m,windspeed_10m,relativehumidity_2m,snowfall,weathercode";

/// Daily variables requested from Open-Meteo
const DAILY_FIELDS: &str = "temperature_2m_mean,temperature_2m_max,temperature_2m_min,precipitation_sum,precipitation_probability_mean,windspeed_10m_max,winddirection_10m_dominant,cloudcover_mean,snowfall_sum,weathercode";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Weather API returned status {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

/// Client for fetching forecasts from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    forecast_days: u8,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(&ApiConfig::default())
    }
}

impl WeatherClient {
    /// Create a new WeatherClient from the shared API configuration
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: config.http_client(),
            base_url: config.weather_url.clone(),
            forecast_days: config.forecast_days,
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch hourly and daily forecasts for the given location
    ///
    /// Times in the result are local to the location (`timezone=auto`), wind
    /// speeds are in m/s.
    ///
    /// # Returns
    /// * `Ok(Forecast)` - Normalized forecast with equal-length columns
    /// * `Err(WeatherError)` - If the request, status or parsing fails
    pub async fn fetch_forecast(&self, location: Location) -> Result<Forecast, WeatherError> {
        let url = format!(
            "{}?latitude={}&longitude={}&hourly={}&daily={}&windspeed_unit=ms&timezone=auto&forecast_days={}",
            self.base_url,
            location.latitude,
            location.longitude,
            HOURLY_FIELDS,
            DAILY_FIELDS,
            self.forecast_days
        );
        tracing::debug!("Fetching forecast for {}", location.label());

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        let api_response: OpenMeteoResponse = serde_json::from_str(&text)?;

        self.parse_response(api_response)
    }

    /// Parse the Open-Meteo API response into a Forecast
    fn parse_response(&self, response: OpenMeteoResponse) -> Result<Forecast, WeatherError> {
        let hourly = response
            .hourly
            .ok_or_else(|| WeatherError::MissingField("hourly".to_string()))?;
        let daily = response
            .daily
            .ok_or_else(|| WeatherError::MissingField("daily".to_string()))?;

        Ok(Forecast {
            timezone: response.timezone,
            utc_offset_seconds: response.utc_offset_seconds,
            hourly: self.parse_hourly_data(hourly)?,
            daily: self.parse_daily_data(daily)?,
        })
    }

    /// Convert hourly arrays into an HourlySeries with one shared time axis
    fn parse_hourly_data(&self, hourly: HourlyWeather) -> Result<HourlySeries, WeatherError> {
        let time = hourly
            .time
            .ok_or_else(|| WeatherError::MissingField("hourly.time".to_string()))?
            .iter()
            .map(|t| parse_datetime(t))
            .collect::<Result<Vec<_>, _>>()?;

        let mut series = HourlySeries {
            time,
            temperature: hourly.temperature_2m,
            precipitation: hourly.precipitation,
            precipitation_probability: hourly.precipitation_probability,
            cloud_cover: hourly.cloudcover,
            wind_speed: hourly.windspeed_10m,
            wind_direction: hourly.winddirection_10m,
            humidity: hourly.relativehumidity_2m,
            solar_radiation: hourly.direct_radiation,
            snowfall: hourly.snowfall,
            weather_code: hourly.weathercode,
        };
        series.normalize();
        Ok(series)
    }

    /// Convert daily arrays into a DailySeries with one shared date axis
    fn parse_daily_data(&self, daily: DailyWeather) -> Result<DailySeries, WeatherError> {
        let time = daily
            .time
            .ok_or_else(|| WeatherError::MissingField("daily.time".to_string()))?
            .iter()
            .map(|d| parse_date(d))
            .collect::<Result<Vec<_>, _>>()?;

        let mut series = DailySeries {
            time,
            temperature_mean: daily.temperature_2m_mean,
            temperature_max: daily.temperature_2m_max,
            temperature_min: daily.temperature_2m_min,
            precipitation_sum: daily.precipitation_sum,
            precipitation_probability_mean: daily.precipitation_probability_mean,
            wind_speed_max: daily.windspeed_10m_max,
            wind_direction_dominant: daily.winddirection_10m_dominant,
            cloud_cover_mean: daily.cloudcover_mean,
            snowfall_sum: daily.snowfall_sum,
            weather_code: daily.weathercode,
        };
        series.normalize();
        Ok(series)
    }
}

/// Parse a datetime string in ISO 8601 format (e.g., "2024-07-15T05:00") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M")
        .map_err(|_| WeatherError::InvalidTimeFormat(datetime_str.to_string()))
}

/// Parse a date string (e.g., "2024-07-15") to NaiveDate
fn parse_date(date_str: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| WeatherError::InvalidTimeFormat(date_str.to_string()))
}

/// Map WMO weather code to WeatherCondition enum
///
/// Weather codes from WMO (World Meteorological Organization):
/// - 0: Clear sky
/// - 1-3: Partly cloudy
/// - 45, 48: Fog
/// - 51-55: Drizzle
/// - 56-57: Freezing drizzle
/// - 61-65: Rain
/// - 66-67: Freezing rain
/// - 71-77: Snow
/// - 80-82: Rain showers
/// - 85-86: Snow showers
/// - 95-99: Thunderstorm
pub fn weather_code_to_condition(code: u8) -> WeatherCondition {
    match code {
        0 => WeatherCondition::Clear,
        1..=3 => WeatherCondition::PartlyCloudy,
        45 | 48 => WeatherCondition::Fog,
        51..=55 | 61..=65 | 80..=82 => WeatherCondition::Rain,
        56..=57 | 66..=67 => WeatherCondition::FreezingRain,
        71..=77 | 85..=86 => WeatherCondition::Snow,
        95..=99 => WeatherCondition::Thunderstorm,
        _ => WeatherCondition::Cloudy,
    }
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    utc_offset_seconds: i32,
    hourly: Option<HourlyWeather>,
    daily: Option<DailyWeather>,
}

/// Hourly weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct HourlyWeather {
    time: Option<Vec<String>>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    cloudcover: Vec<Option<f64>>,
    #[serde(default)]
    direct_radiation: Vec<Option<f64>>,
    #[serde(default)]
    winddirection_10m: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
    #[serde(default)]
    relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    snowfall: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<u8>>,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Option<Vec<String>>,
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_mean: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    winddirection_10m_dominant: Vec<Option<f64>>,
    #[serde(default)]
    cloudcover_mean: Vec<Option<f64>>,
    #[serde(default)]
    snowfall_sum: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<u8>>,
}
