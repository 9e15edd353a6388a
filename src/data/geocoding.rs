//! Nominatim geocoding client
//!
//! Resolves a free-text place name into a single best-match `Location`.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::Location;
use crate::config::ApiConfig;

/// Errors that can occur when resolving a place name
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The query was empty after trimming
    #[error("Search query is empty")]
    EmptyQuery,

    /// The service found no match for the query
    #[error("No location found for '{0}'")]
    NotFound(String),

    /// The service returned coordinates that are unparsable or out of range
    #[error("Invalid coordinates in response: {0}")]
    InvalidCoordinates(String),

    /// The API answered with a non-success status
    #[error("Geocoding API returned status {0}")]
    Status(u16),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A geocoding match
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub location: Location,
    /// Full place name as reported by the service, if any
    pub display_name: Option<String>,
}

/// Client for the Nominatim search API
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new(&ApiConfig::default())
    }
}

impl GeocodingClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: config.http_client(),
            base_url: config.geocoding_url.clone(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up the best match for `query`
    ///
    /// Whitespace-only queries fail with `EmptyQuery` without touching the network.
    pub async fn lookup(&self, query: &str) -> Result<GeocodedPlace, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        tracing::debug!("Geocoding '{}'", query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        let results: Vec<NominatimPlace> = serde_json::from_str(&text)?;

        let best = results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;
        best.into_place()
    }
}

/// One entry of the Nominatim search response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimPlace {
    fn into_place(self) -> Result<GeocodedPlace, GeocodeError> {
        let invalid = || GeocodeError::InvalidCoordinates(format!("{}, {}", self.lat, self.lon));
        let latitude: f64 = self.lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = self.lon.trim().parse().map_err(|_| invalid())?;
        let location = Location::new(latitude, longitude).ok_or_else(invalid)?;

        Ok(GeocodedPlace {
            location,
            display_name: self.display_name.filter(|name| !name.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN_RESPONSE: &str = r#"[
        {
            "place_id": 240109189,
            "lat": "52.5170365",
            "lon": "13.3888599",
            "display_name": "Berlin, Deutschland",
            "type": "city"
        }
    ]"#;

    fn first_place(json: &str) -> Result<GeocodedPlace, GeocodeError> {
        let results: Vec<NominatimPlace> = serde_json::from_str(json)?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound("test".to_string()))?
            .into_place()
    }

    #[test]
    fn test_parses_string_coordinates() {
        let place = first_place(BERLIN_RESPONSE).expect("Failed to parse place");

        assert!((place.location.latitude - 52.5170365).abs() < 1e-9);
        assert!((place.location.longitude - 13.3888599).abs() < 1e-9);
        assert_eq!(place.display_name.as_deref(), Some("Berlin, Deutschland"));
    }

    #[test]
    fn test_empty_result_is_not_found() {
        assert!(matches!(first_place("[]"), Err(GeocodeError::NotFound(_))));
    }

    #[test]
    fn test_unparsable_coordinates_rejected() {
        let json = r#"[{"lat": "north", "lon": "13.4"}]"#;
        assert!(matches!(
            first_place(json),
            Err(GeocodeError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let json = r#"[{"lat": "95.0", "lon": "13.4"}]"#;
        assert!(matches!(
            first_place(json),
            Err(GeocodeError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_blank_display_name_dropped() {
        let json = r#"[{"lat": "1.0", "lon": "2.0", "display_name": "  "}]"#;
        let place = first_place(json).expect("Failed to parse place");
        assert_eq!(place.display_name, None);
    }

    #[tokio::test]
    async fn test_empty_query_skips_request() {
        // Unroutable endpoint: the call must fail before any request is made
        let client = GeocodingClient::default().with_base_url("http://127.0.0.1:1/search");
        let result = client.lookup("   ").await;
        assert!(matches!(result, Err(GeocodeError::EmptyQuery)));
    }
}
