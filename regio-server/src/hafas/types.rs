//! transport.rest response DTOs.
//!
//! These types map directly to the JSON returned by the HAFAS-backed
//! `transport.rest` API. They use `Option` liberally because the API omits
//! fields (or sends `null`) whenever it has no data.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;

/// Response from `GET /stations`.
///
/// The API answers with an object keyed by station id, in relevance order.
/// Some deployments answer with a plain array of station objects instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StationsResponse {
    /// `{"8000206": {...}, ...}`
    Keyed(serde_json::Map<String, Value>),

    /// `[{...}, ...]`
    List(Vec<StationDto>),

    /// `null` or any other shape: no match.
    Other(IgnoredAny),
}

/// A station search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationDto {
    /// Station id; may be a JSON string or number.
    pub id: Option<Value>,

    /// Display name.
    pub name: Option<String>,
}

/// Response from `GET /stops/{id}/departures`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeparturesResponse {
    /// v6 shape: `{"departures": [...], "realtimeDataUpdatedAt": ...}`
    Wrapped { departures: Vec<DepartureDto> },

    /// Bare array of departures.
    List(Vec<DepartureDto>),

    /// Anything else is treated as "no departures".
    Other(IgnoredAny),
}

impl DeparturesResponse {
    pub fn into_departures(self) -> Vec<DepartureDto> {
        match self {
            DeparturesResponse::Wrapped { departures } => departures,
            DeparturesResponse::List(departures) => departures,
            DeparturesResponse::Other(_) => Vec::new(),
        }
    }
}

/// One entry of a departure board.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureDto {
    /// HAFAS trip id, needed to fetch the stop sequence.
    pub trip_id: Option<String>,

    /// Line metadata.
    pub line: Option<LineDto>,

    /// Headsign of the service.
    pub direction: Option<String>,
}

/// Line metadata attached to a departure.
///
/// Kept as the raw JSON object: transport.rest always sends `type` and `id`
/// here, so a line counts as present whenever the object has any key, even
/// if none of the fields read below is set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LineDto(pub serde_json::Map<String, Value>);

impl LineDto {
    /// Whether the upstream object had no keys at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display name, e.g. "RE 5".
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// Product category, e.g. "regionalExpress", "regional", "suburban".
    pub fn product(&self) -> Option<&str> {
        self.text("product")
    }

    /// Transport mode, e.g. "train".
    pub fn mode(&self) -> Option<&str> {
        self.text("mode")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// Response from `GET /trips/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TripResponse {
    /// v6 shape: `{"trip": {...}, "realtimeDataUpdatedAt": ...}`
    Wrapped { trip: TripDto },

    /// Bare trip object.
    Bare(TripDto),
}

impl TripResponse {
    pub fn into_trip(self) -> TripDto {
        match self {
            TripResponse::Wrapped { trip } => trip,
            TripResponse::Bare(trip) => trip,
        }
    }
}

/// A trip with its stopovers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripDto {
    /// Stops in origin-to-terminus order. Only present with `stopovers=true`.
    pub stopovers: Option<Vec<StopoverDto>>,
}

/// One stop of a trip.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopoverDto {
    pub stop: Option<StationDto>,

    /// Realtime arrival (ISO 8601).
    pub arrival: Option<String>,

    /// Planned arrival (ISO 8601).
    pub planned_arrival: Option<String>,

    /// Realtime departure (ISO 8601).
    pub departure: Option<String>,

    /// Planned departure (ISO 8601).
    pub planned_departure: Option<String>,
}
