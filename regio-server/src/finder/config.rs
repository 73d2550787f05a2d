//! Configuration for the direct-connection finder.

use std::time::Duration;

/// Configuration parameters for a longest-direct search.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Maximum number of departures expanded into full trips.
    /// Departures beyond this are ignored, bounding the fan-out per request.
    pub max_trips: usize,

    /// Number of departures requested from the provider.
    pub departure_results: u32,

    /// Timeout for each individual trip lookup (seconds).
    /// Starts when the lookup is allowed to run, not when it is queued.
    pub trip_timeout_secs: u64,

    /// Maximum number of trip lookups in flight per search.
    pub max_concurrent_trips: usize,
}

impl FinderConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_trips: usize, departure_results: u32, trip_timeout_secs: u64) -> Self {
        Self {
            max_trips,
            departure_results,
            trip_timeout_secs,
            ..Self::default()
        }
    }

    /// Set the trip expansion cap.
    pub fn with_max_trips(mut self, max_trips: usize) -> Self {
        self.max_trips = max_trips;
        self
    }

    /// Set how many trip lookups may run at once.
    pub fn with_max_concurrent_trips(mut self, n: usize) -> Self {
        self.max_concurrent_trips = n;
        self
    }

    /// Returns the per-trip timeout as a Duration.
    pub fn trip_timeout(&self) -> Duration {
        Duration::from_secs(self.trip_timeout_secs)
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_trips: 80,
            departure_results: 200,
            trip_timeout_secs: 20,
            max_concurrent_trips: 16,
        }
    }
}
