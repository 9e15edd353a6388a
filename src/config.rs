//! Endpoint and request configuration for the external weather services
//!
//! Every client takes its base URL from an `ApiConfig` so tests can point
//! them at a local mock server.

use std::time::Duration;

/// Default Nominatim search endpoint used for geocoding
pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Default Open-Meteo forecast endpoint
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Default coordinate-to-timezone endpoint
pub const DEFAULT_TIMEZONE_URL: &str = "https://timeapi.io/api/TimeZone/coordinate";

/// Nominatim rejects requests without an identifying user agent
const USER_AGENT: &str = concat!("helloweather/", env!("CARGO_PKG_VERSION"));

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of forecast days requested from the weather API
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

/// Configuration shared by the geocoding, weather and timezone clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Geocoding search endpoint
    pub geocoding_url: String,
    /// Weather forecast endpoint
    pub weather_url: String,
    /// Timezone lookup endpoint
    pub timezone_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Number of days of forecast to request
    pub forecast_days: u8,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            timezone_url: DEFAULT_TIMEZONE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }
}

impl ApiConfig {
    /// Builds the shared `reqwest` client with timeout and user agent applied
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            })
    }

    /// Points every endpoint at the same base URL (used with mock servers)
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocoding_url: format!("{}/search", base),
            weather_url: format!("{}/v1/forecast", base),
            timezone_url: format!("{}/api/TimeZone/coordinate", base),
            ..Self::default()
        }
    }
}
