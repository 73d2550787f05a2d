//! Stop sequences of a single trip.
//!
//! A `Stopover` is one stop of a trip with planned and realtime
//! arrival/departure times. A `StopSequence` is the full, ordered list of
//! stopovers from the trip's origin to its terminus.

use super::{Station, StationId, Timestamp};

/// Index of a stopover within a trip's stop sequence.
///
/// Used instead of `StationId` because a trip may serve the same station
/// more than once (loops, reversals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopIndex(pub usize);

impl std::fmt::Display for StopIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stop of a trip.
///
/// Realtime times override planned times when available. The provider
/// occasionally omits a stop's identity; such a stop keeps its place in the
/// sequence but never matches a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopover {
    pub station: Option<Station>,
    /// Planned arrival time
    pub planned_arrival: Option<Timestamp>,
    /// Realtime (prognosed or actual) arrival time
    pub arrival: Option<Timestamp>,
    /// Planned departure time
    pub planned_departure: Option<Timestamp>,
    /// Realtime (prognosed or actual) departure time
    pub departure: Option<Timestamp>,
}

impl Stopover {
    /// Creates a stopover without any times.
    pub fn new(station: Station) -> Self {
        Self::at(Some(station))
    }

    /// Creates a stopover whose station is unknown.
    pub fn unidentified() -> Self {
        Self::at(None)
    }

    fn at(station: Option<Station>) -> Self {
        Self {
            station,
            planned_arrival: None,
            arrival: None,
            planned_departure: None,
            departure: None,
        }
    }

    pub fn station_id(&self) -> Option<&StationId> {
        self.station.as_ref().map(|s| &s.id)
    }

    /// Best available arrival time (realtime if available, else planned).
    pub fn effective_arrival(&self) -> Option<Timestamp> {
        self.arrival.or(self.planned_arrival)
    }

    /// Best available departure time (realtime if available, else planned).
    pub fn effective_departure(&self) -> Option<Timestamp> {
        self.departure.or(self.planned_departure)
    }
}

/// The ordered stopovers of one trip, origin to terminus, as reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopSequence {
    stops: Vec<Stopover>,
}

impl StopSequence {
    pub fn new(stops: Vec<Stopover>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, index: StopIndex) -> Option<&Stopover> {
        self.stops.get(index.0)
    }

    /// The trip's terminus.
    pub fn last(&self) -> Option<&Stopover> {
        self.stops.last()
    }

    /// Position of the first stopover at the given station.
    pub fn position_of(&self, station: &StationId) -> Option<StopIndex> {
        self.stops
            .iter()
            .position(|s| s.station_id() == Some(station))
            .map(StopIndex)
    }

    /// Whether `index` is the final stop (or beyond it).
    pub fn is_terminal(&self, index: StopIndex) -> bool {
        index.0 + 1 >= self.stops.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stopover> {
        self.stops.iter()
    }
}

impl From<Vec<Stopover>> for StopSequence {
    fn from(stops: Vec<Stopover>) -> Self {
        Self::new(stops)
    }
}
