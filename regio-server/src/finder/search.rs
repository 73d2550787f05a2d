//! The longest-direct-ride search pipeline.
//!
//! Resolves the origin station, lists its regional departures, fetches the
//! stop sequence of each (bounded) departure concurrently, derives one
//! candidate connection per trip and folds the candidates into a ranked,
//! deduplicated list.

use std::future::Future;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace, warn};

use crate::domain::{Connection, Departure, Station, StopSequence, Timestamp, TripRef};

use super::aggregate::aggregate;
use super::config::FinderConfig;
use super::derive::derive_connection;

/// Error from a longest-direct search.
///
/// The three "not found" variants are client-visible outcomes; `Upstream`
/// means the provider could not be reached or answered with an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinderError {
    /// The station search returned no candidates
    #[error("Kein Bahnhof gefunden für '{query}'.")]
    StationNotFound { query: String },

    /// No regional departures in the requested window
    #[error("Keine Abfahrten im angegebenen Zeitfenster für '{station}'.")]
    NoDepartures { station: String },

    /// Departures existed but none produced a usable connection
    #[error(
        "Es konnten keine durchgehenden Regionalzug-Verbindungen mit berechenbarer Dauer gefunden werden."
    )]
    NoConnections,

    /// Station search or departure listing failed at the transport level
    #[error("upstream provider unavailable: {0}")]
    Upstream(String),

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

impl FinderError {
    /// Whether this is one of the "nothing found" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FinderError::StationNotFound { .. }
                | FinderError::NoDepartures { .. }
                | FinderError::NoConnections
        )
    }
}

/// Parameters for the departure listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureQuery {
    /// Start of the window; `None` means "now" at the provider.
    pub when: Option<Timestamp>,

    /// Length of the window in minutes.
    pub window_minutes: u32,

    /// Maximum number of departures to request.
    pub max_results: u32,
}

/// Source of station, departure and trip data.
///
/// This abstraction allows the finder to be tested with in-memory data.
pub trait TransitProvider: Sync {
    /// Resolve free text to the best matching station, if any.
    fn search_station(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Station>, FinderError>> + Send;

    /// List regional-rail departures from `station`, in board order.
    fn departures(
        &self,
        station: &Station,
        query: &DepartureQuery,
    ) -> impl Future<Output = Result<Vec<Departure>, FinderError>> + Send;

    /// Fetch the stop sequence of a trip.
    ///
    /// Failures are reported as `None`; one bad trip must not abort the
    /// search.
    fn trip(&self, trip: &TripRef) -> impl Future<Output = Option<StopSequence>> + Send;
}

/// Request for a longest-direct search.
#[derive(Debug, Clone)]
pub struct FindRequest {
    /// Free-text origin station name.
    pub station: String,

    /// Maximum number of connections to return.
    pub limit: usize,

    /// Search window in minutes.
    pub window_minutes: u32,

    /// Start of the search window (defaults to now).
    pub when: Option<Timestamp>,
}

impl FindRequest {
    /// Create a new request starting now.
    pub fn new(station: impl Into<String>, limit: usize, window_minutes: u32) -> Self {
        Self {
            station: station.into(),
            limit,
            window_minutes,
            when: None,
        }
    }

    /// Set the start of the search window.
    pub fn at(mut self, when: Timestamp) -> Self {
        self.when = Some(when);
        self
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), FinderError> {
        if self.station.trim().is_empty() {
            return Err(FinderError::InvalidRequest(
                "station must not be empty".to_string(),
            ));
        }

        if self.limit == 0 {
            return Err(FinderError::InvalidRequest(
                "limit must be at least 1".to_string(),
            ));
        }

        if self.window_minutes == 0 {
            return Err(FinderError::InvalidRequest(
                "search window must be at least 1 minute".to_string(),
            ));
        }

        Ok(())
    }
}

/// Result of a longest-direct search.
#[derive(Debug, Clone)]
pub struct FindResult {
    /// The resolved origin station.
    pub origin: Station,

    /// Connections, longest first, one per route.
    pub connections: Vec<Connection>,

    /// Number of usable departures the provider listed.
    pub departures_listed: usize,

    /// Number of departures expanded into trips.
    pub trips_checked: usize,
}

/// Longest-direct-ride finder.
pub struct Finder<'a, P: TransitProvider> {
    provider: &'a P,
    config: &'a FinderConfig,
}

impl<'a, P: TransitProvider> Finder<'a, P> {
    /// Create a new finder.
    pub fn new(provider: &'a P, config: &'a FinderConfig) -> Self {
        Self { provider, config }
    }

    /// Resolve a free-text station name, taking the first match.
    pub async fn resolve(&self, query: &str) -> Result<Station, FinderError> {
        self.provider
            .search_station(query.trim())
            .await?
            .ok_or_else(|| FinderError::StationNotFound {
                query: query.to_string(),
            })
    }

    /// Run the full search.
    pub async fn find(&self, request: &FindRequest) -> Result<FindResult, FinderError> {
        request.validate()?;

        let origin = self.resolve(&request.station).await?;
        debug!(station = %origin.id, name = %origin.name, "resolved origin");

        let query = DepartureQuery {
            when: request.when,
            window_minutes: request.window_minutes,
            max_results: self.config.departure_results,
        };
        let departures = self.provider.departures(&origin, &query).await?;

        if departures.is_empty() {
            return Err(FinderError::NoDepartures {
                station: origin.name.clone(),
            });
        }

        let to_check = &departures[..departures.len().min(self.config.max_trips)];
        if to_check.len() < departures.len() {
            debug!(
                listed = departures.len(),
                checked = to_check.len(),
                "capping trip lookups"
            );
        }

        let sequences = self.fetch_sequences(to_check).await;

        // `sequences` is in departure order, which the aggregator relies on
        let candidates = to_check
            .iter()
            .zip(sequences)
            .filter_map(|(departure, sequence)| {
                let sequence = sequence?;
                match derive_connection(&origin, departure, &sequence) {
                    Ok(connection) => Some(connection),
                    Err(reason) => {
                        trace!(trip = %departure.trip_ref, %reason, "skipping trip");
                        None
                    }
                }
            });

        let connections = aggregate(candidates, request.limit);

        if connections.is_empty() {
            return Err(FinderError::NoConnections);
        }

        info!(
            station = %origin.name,
            departures = departures.len(),
            trips = to_check.len(),
            results = connections.len(),
            "longest direct search complete"
        );

        Ok(FindResult {
            origin,
            connections,
            departures_listed: departures.len(),
            trips_checked: to_check.len(),
        })
    }

    /// Fetch the stop sequences of all departures concurrently.
    ///
    /// The result has one entry per departure, in the same order. At most
    /// `max_concurrent_trips` lookups run at once. Each has its own timeout,
    /// started once the lookup gets to run, so time spent queued behind
    /// other trips never counts against it. A timed-out, failed or empty
    /// lookup is `None` and does not affect the others.
    async fn fetch_sequences(&self, departures: &[Departure]) -> Vec<Option<StopSequence>> {
        let timeout = self.config.trip_timeout();
        let slots = Semaphore::new(self.config.max_concurrent_trips.max(1));
        let slots = &slots;

        let lookups = departures.iter().map(|departure| async move {
            let Ok(_slot) = slots.acquire().await else {
                return None;
            };

            match tokio::time::timeout(timeout, self.provider.trip(&departure.trip_ref)).await {
                Ok(Some(sequence)) if !sequence.is_empty() => Some(sequence),
                Ok(_) => None,
                Err(_) => {
                    warn!(
                        trip = %departure.trip_ref,
                        timeout_secs = timeout.as_secs(),
                        "trip lookup timed out"
                    );
                    None
                }
            }
        });

        join_all(lookups).await
    }
}
