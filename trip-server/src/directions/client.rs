//! Google Maps HTTP client.
//!
//! Resolves free-text places with the Geocoding API and fetches driving
//! routes with the Directions API. Requests are authenticated with an API
//! key and limited by a semaphore.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{DrivingPath, Location, Region};

use super::convert::{convert_directions, convert_geocode};
use super::error::DirectionsError;
use super::types::{DirectionsResponse, GeocodeResponse};

/// Default base URL for the Google Maps web services.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API (defaults to Google)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Google Maps API client.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl DirectionsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        if config.api_key.trim().is_empty() {
            return Err(DirectionsError::NotConfigured("empty API key".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Resolve free text to a place inside `region`.
    ///
    /// The lookup is biased to the region's bounding box and restricted to
    /// its country; results outside the box are discarded.
    pub async fn resolve_place(
        &self,
        query: &str,
        region: &Region,
    ) -> Result<Location, DirectionsError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DirectionsError::PlaceNotResolved(String::new()));
        }

        let b = &region.bounds;
        let params = [
            ("address", query.to_string()),
            ("bounds", format!("{},{}|{},{}", b.south, b.west, b.north, b.east)),
            ("components", format!("country:{}", region.country)),
        ];

        let response: GeocodeResponse = self.get_json("geocode/json", &params).await?;
        convert_geocode(&response, query, region)
    }

    /// Fetch the driving route between two places.
    pub async fn compute_driving_path(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<DrivingPath, DirectionsError> {
        let params = [
            ("origin", format!("{},{}", origin.latitude, origin.longitude)),
            (
                "destination",
                format!("{},{}", destination.latitude, destination.longitude),
            ),
            ("mode", "driving".to_string()),
        ];

        let response: DirectionsResponse = self.get_json("directions/json", &params).await?;
        convert_directions(&response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, DirectionsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DirectionsError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "directions request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DirectionsError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DirectionsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| DirectionsError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = DirectionsConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builders() {
        let config = DirectionsConfig::new("key")
            .with_base_url("http://localhost:8080/")
            .with_max_concurrent(2)
            .with_timeout(5);
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 5);

        let client = DirectionsClient::new(config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn empty_key_not_configured() {
        let err = DirectionsClient::new(DirectionsConfig::new("  ")).unwrap_err();
        assert!(matches!(err, DirectionsError::NotConfigured(_)));
    }
}
