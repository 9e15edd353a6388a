//! Coordinate-to-timezone lookup
//!
//! Used when the weather response does not carry a usable IANA zone, or on
//! every lookup with `--timezone-lookup`. `resolve` never fails: any problem
//! is logged and UTC is returned instead.

use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::Location;
use crate::config::ApiConfig;

/// Errors from the timezone service
#[derive(Debug, Error)]
pub enum TimezoneError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Timezone API returned status {0}")]
    Status(u16),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Unknown zone '{0}'")]
    UnknownZone(String),
}

/// Client for the timeapi.io coordinate endpoint
#[derive(Debug, Clone)]
pub struct TimezoneClient {
    client: Client,
    base_url: String,
}

impl Default for TimezoneClient {
    fn default() -> Self {
        Self::new(&ApiConfig::default())
    }
}

impl TimezoneClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: config.http_client(),
            base_url: config.timezone_url.clone(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve the timezone of `location`, falling back to UTC
    pub async fn resolve(&self, location: Location) -> Tz {
        match self.fetch_zone(location).await {
            Ok(zone) => zone,
            Err(e) => {
                tracing::warn!(
                    "Timezone lookup for {} failed ({}), using UTC",
                    location.label(),
                    e
                );
                Tz::UTC
            }
        }
    }

    /// Ask the service for the zone of `location`
    pub async fn fetch_zone(&self, location: Location) -> Result<Tz, TimezoneError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TimezoneError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        let body: TimezoneResponse = serde_json::from_str(&text)?;

        parse_zone(&body.time_zone).ok_or(TimezoneError::UnknownZone(body.time_zone))
    }
}

/// Parse an IANA zone label such as "Europe/Berlin"
pub fn parse_zone(label: &str) -> Option<Tz> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    label.parse::<Tz>().ok()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimezoneResponse {
    time_zone: String,
}
