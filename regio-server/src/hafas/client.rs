//! transport.rest HTTP client.
//!
//! Provides async methods for station search, departure boards and trip
//! details, and converts responses into domain types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Departure, Station, StationId, StopSequence, Timestamp, TripRef};

use super::convert::{convert_departures, convert_trip, first_station};
use super::error::HafasError;
use super::types::{DeparturesResponse, StationsResponse, TripResponse};

/// Default base URL: the DB (Deutsche Bahn) profile of transport.rest.
pub const DEFAULT_BASE_URL: &str = "https://v6.db.transport.rest";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Language for names and remarks in responses.
const LANGUAGE: &str = "de";

/// Product filters sent with departure requests: regional rail only.
const REGIONAL_PRODUCTS: &[(&str, &str)] = &[
    ("nationalExpress", "false"),
    ("national", "false"),
    ("regionalExpress", "true"),
    ("regional", "true"),
    ("suburban", "true"),
    ("bus", "false"),
    ("ferry", "false"),
    ("subway", "false"),
    ("tram", "false"),
    ("taxi", "false"),
];

/// Configuration for the transport.rest client.
#[derive(Debug, Clone)]
pub struct HafasConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent station and departure requests
    pub max_concurrent: usize,
    /// Timeout for station searches in seconds
    pub search_timeout_secs: u64,
    /// Timeout for departure boards in seconds
    pub departures_timeout_secs: u64,
    /// Timeout for single trip lookups in seconds
    pub trip_timeout_secs: u64,
}

impl HafasConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set the trip lookup timeout.
    pub fn with_trip_timeout(mut self, secs: u64) -> Self {
        self.trip_timeout_secs = secs;
        self
    }
}

impl Default for HafasConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            search_timeout_secs: 10,
            departures_timeout_secs: 20,
            trip_timeout_secs: 20,
        }
    }
}

/// transport.rest API client.
///
/// Cheap to clone; clones share one connection pool and one semaphore,
/// which caps the station and departure requests in flight. Trip lookups
/// are bounded by their caller.
#[derive(Debug, Clone)]
pub struct HafasClient {
    http: reqwest::Client,
    base_url: Url,
    semaphore: Arc<Semaphore>,
    search_timeout: Duration,
    departures_timeout: Duration,
    trip_timeout: Duration,
}

impl HafasClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HafasConfig) -> Result<Self, HafasError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| HafasError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(HafasError::InvalidBaseUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            departures_timeout: Duration::from_secs(config.departures_timeout_secs),
            trip_timeout: Duration::from_secs(config.trip_timeout_secs),
        })
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issue a GET request and decode the JSON body, waiting for a
    /// concurrency permit first.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, HafasError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| HafasError::ApiError {
                status: 0,
                message: "request limiter closed".to_string(),
            })?;

        self.fetch_json(url, query, timeout).await
    }

    /// Issue a GET request and decode the JSON body.
    ///
    /// `timeout` covers the request alone, from sending it to reading the
    /// body.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, HafasError> {
        debug!(url = %url, "transport.rest request");
        let path = url.path().to_string();

        let response = self
            .http
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(HafasError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HafasError::NotFound { path });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HafasError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| HafasError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Find the best match for a free-text station name.
    ///
    /// Uses fuzzy, completion-enabled search and takes the first result.
    /// Returns `Ok(None)` when nothing matches.
    pub async fn search_station(&self, query: &str) -> Result<Option<Station>, HafasError> {
        let url = self.endpoint(&["stations"]);
        let params = [
            ("query", query.to_string()),
            ("limit", "1".to_string()),
            ("completion", "true".to_string()),
            ("fuzzy", "true".to_string()),
        ];

        let response: StationsResponse =
            self.get_json(url, &params, self.search_timeout).await?;

        Ok(first_station(response, query))
    }

    /// Get regional-rail departures from a station.
    ///
    /// # Arguments
    ///
    /// * `station` - Station id
    /// * `when` - Start of the window (defaults to now upstream)
    /// * `duration_mins` - Length of the window in minutes
    /// * `results` - Maximum number of departures to request
    pub async fn departures(
        &self,
        station: &StationId,
        when: Option<Timestamp>,
        duration_mins: u32,
        results: u32,
    ) -> Result<Vec<Departure>, HafasError> {
        let url = self.endpoint(&["stops", station.as_str(), "departures"]);

        let mut params: Vec<(&str, String)> = vec![
            ("duration", duration_mins.to_string()),
            ("results", results.to_string()),
            ("language", LANGUAGE.to_string()),
        ];
        params.extend(
            REGIONAL_PRODUCTS
                .iter()
                .map(|(name, value)| (*name, (*value).to_string())),
        );
        if let Some(when) = when {
            params.push(("when", when.to_rfc3339()));
        }

        let response: DeparturesResponse = self
            .get_json(url, &params, self.departures_timeout)
            .await?;

        Ok(convert_departures(&response.into_departures()))
    }

    /// Get the full stop sequence of a trip.
    ///
    /// Unlike station search and departures, trip lookups do not queue on
    /// the client's request limiter: callers fan these out and bound them
    /// themselves, so the request timeout only ever covers the request.
    pub async fn trip(&self, trip: &TripRef) -> Result<StopSequence, HafasError> {
        let url = self.endpoint(&["trips", trip.as_str()]);
        let params = [
            ("stopovers", "true".to_string()),
            ("remarks", "false".to_string()),
            ("polyline", "false".to_string()),
            ("language", LANGUAGE.to_string()),
        ];

        let response: TripResponse = self.fetch_json(url, &params, self.trip_timeout).await?;

        Ok(convert_trip(&response.into_trip()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = HafasConfig::new("http://localhost:3000")
            .with_max_concurrent(4)
            .with_trip_timeout(5);

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.trip_timeout_secs, 5);
        assert_eq!(config.search_timeout_secs, 10);
    }

    #[test]
    fn config_defaults() {
        let config = HafasConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.search_timeout_secs, 10);
        assert_eq!(config.departures_timeout_secs, 20);
        assert_eq!(config.trip_timeout_secs, 20);
    }

    #[test]
    fn client_creation() {
        let client = HafasClient::new(HafasConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = HafasClient::new(HafasConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, HafasError::InvalidBaseUrl(_)));

        let err = HafasClient::new(HafasConfig::new("mailto:someone@example.com")).unwrap_err();
        assert!(matches!(err, HafasError::InvalidBaseUrl(_)));
    }

    #[test]
    fn endpoint_escapes_fragment_marker() {
        let client = HafasClient::new(HafasConfig::default()).unwrap();
        let url = client.endpoint(&["trips", "1|300484|0|80|29112025#x"]);
        assert_eq!(
            url.as_str(),
            "https://v6.db.transport.rest/trips/1|300484|0|80|29112025%23x"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = HafasClient::new(HafasConfig::new("http://localhost:3000/db/")).unwrap();
        let id = StationId::parse("8000206").unwrap();
        let url = client.endpoint(&["stops", id.as_str(), "departures"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/db/stops/8000206/departures"
        );
    }

    #[test]
    fn regional_filters_exclude_other_modes() {
        let enabled: Vec<_> = REGIONAL_PRODUCTS
            .iter()
            .filter(|(_, v)| *v == "true")
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(enabled, vec!["regionalExpress", "regional", "suburban"]);
    }

    // Requests against the live API are not exercised here; the finder
    // tests drive the pipeline through an in-memory provider instead.
}
