//! Location lookup orchestration
//!
//! `WeatherService` turns a search query or a picked coordinate into a
//! `LoadedForecast`: geocode if needed, fetch the forecast, then settle on
//! the location's timezone.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use super::geocoding::{GeocodeError, GeocodingClient};
use super::timezone::{parse_zone, TimezoneClient};
use super::weather::{WeatherClient, WeatherError};
use super::{Forecast, Location};
use crate::config::ApiConfig;

/// What the user asked to see
#[derive(Debug, Clone, PartialEq)]
pub enum LookupTarget {
    /// Free-text place name to geocode
    Query(String),
    /// Already-known coordinates, with an optional display label
    Coordinates {
        location: Location,
        label: Option<String>,
    },
}

impl LookupTarget {
    /// Coordinates target without a label
    pub fn at(location: Location) -> Self {
        LookupTarget::Coordinates {
            location,
            label: None,
        }
    }
}

/// A forecast ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedForecast {
    pub location: Location,
    /// Name shown in the header; the query, the geocoder's name or the coordinates
    pub place_name: String,
    pub forecast: Forecast,
    /// Zone shown in the header
    pub timezone: Tz,
    pub fetched_at: DateTime<Utc>,
}

impl LoadedForecast {
    /// Current wall-clock time at the location
    pub fn local_now(&self) -> NaiveDateTime {
        self.local_time_at(Utc::now())
    }

    /// Wall-clock time of `instant` on the clock the hourly timestamps use
    ///
    /// The weather API reports its times in the forecast's own zone, so that
    /// zone wins over the displayed one. Without a parseable label the
    /// reported UTC offset is applied.
    pub fn local_time_at(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match parse_zone(&self.forecast.timezone) {
            Some(zone) => instant.with_timezone(&zone).naive_local(),
            None => {
                instant.naive_utc()
                    + Duration::seconds(i64::from(self.forecast.utc_offset_seconds))
            }
        }
    }
}

/// Errors that can occur during a lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl LookupError {
    /// The only failure text shown to the user
    pub const USER_MESSAGE: &'static str = "Error fetching data.";
}

/// Combines the geocoding, weather and timezone clients
#[derive(Debug, Clone, Default)]
pub struct WeatherService {
    geocoder: GeocodingClient,
    weather: WeatherClient,
    timezone: TimezoneClient,
    always_lookup_timezone: bool,
}

impl WeatherService {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            geocoder: GeocodingClient::new(config),
            weather: WeatherClient::new(config),
            timezone: TimezoneClient::new(config),
            always_lookup_timezone: false,
        }
    }

    /// Ask the timezone service on every lookup instead of trusting the weather label
    pub fn with_timezone_lookup(mut self, always: bool) -> Self {
        self.always_lookup_timezone = always;
        self
    }

    /// Resolve `target` and fetch its forecast
    pub async fn lookup(&self, target: LookupTarget) -> Result<LoadedForecast, LookupError> {
        let (location, place_name) = match target {
            LookupTarget::Query(query) => {
                let place = self.geocoder.lookup(&query).await?;
                if let Some(full_name) = &place.display_name {
                    tracing::debug!("'{}' resolved to {}", query.trim(), full_name);
                }
                // Header keeps the user's wording
                (place.location, query.trim().to_string())
            }
            LookupTarget::Coordinates { location, label } => {
                let name = label
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| location.label());
                (location, name)
            }
        };

        let (forecast, timezone) = if self.always_lookup_timezone {
            let (forecast, looked_up) = futures::future::join(
                self.weather.fetch_forecast(location),
                self.timezone.fetch_zone(location),
            )
            .await;
            let forecast = forecast?;
            let zone = match looked_up {
                Ok(zone) => zone,
                Err(e) => {
                    tracing::warn!("Timezone lookup for {} failed: {}", location.label(), e);
                    parse_zone(&forecast.timezone).unwrap_or(Tz::UTC)
                }
            };
            (forecast, zone)
        } else {
            let forecast = self.weather.fetch_forecast(location).await?;
            let zone = match parse_zone(&forecast.timezone) {
                Some(zone) => zone,
                None => self.timezone.resolve(location).await,
            };
            (forecast, zone)
        };

        tracing::info!(
            "Loaded forecast for {} ({} hours, {} days, {})",
            place_name,
            forecast.hourly.len(),
            forecast.daily.len(),
            timezone
        );

        Ok(LoadedForecast {
            location,
            place_name,
            forecast,
            timezone,
            fetched_at: Utc::now(),
        })
    }
}
