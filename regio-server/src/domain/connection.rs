//! Direct connection results.

use std::fmt;

use super::{Station, StationId, Timestamp, TripRef};

/// A direct ride from the origin station to a trip's terminus.
///
/// Built only by the connection deriver, which guarantees:
/// - `duration_minutes` is the floor of the elapsed minutes and is positive
/// - `to_station` is the last stop of the trip
/// - `stops_after_origin` is at least 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub line_name: String,
    pub product: String,
    /// Direction text; empty when the provider omits it
    pub direction: String,
    pub from_station: Station,
    pub to_station: Station,
    pub departure: Timestamp,
    pub arrival: Timestamp,
    pub duration_minutes: i64,
    pub stops_after_origin: usize,
    pub trip_ref: TripRef,
}

impl Connection {
    /// The route identity used for deduplication.
    pub fn route_key(&self) -> RouteKey {
        RouteKey {
            line_name: self.line_name.clone(),
            direction: self.direction.clone(),
            terminus: self.to_station.id.clone(),
        }
    }
}

/// Route identity: (line name, direction, terminus station id).
///
/// Connections sharing a key are repeated runs of the same logical route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub line_name: String,
    pub direction: String,
    pub terminus: StationId,
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.line_name, self.direction, self.terminus)
    }
}
