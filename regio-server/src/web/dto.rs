//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Connection, Station, parse_timestamp};
use crate::finder::FindRequest;

/// Default number of connections returned.
pub const DEFAULT_LIMIT: usize = 10;

/// Accepted range for `limit`.
pub const LIMIT_RANGE: std::ops::RangeInclusive<usize> = 1..=50;

/// Default search window in minutes.
pub const DEFAULT_DURATION: u32 = 240;

/// Accepted range for `duration` (minutes).
pub const DURATION_RANGE: std::ops::RangeInclusive<u32> = 30..=720;

/// Query parameters of `GET /longest-direct`.
///
/// Everything arrives as text so malformed values can be reported with the
/// same JSON error body as out-of-range ones.
#[derive(Debug, Default, Deserialize)]
pub struct LongestDirectQuery {
    /// Origin station name, e.g. "Koblenz Hbf"
    pub station: Option<String>,

    /// Number of connections (1-50)
    pub limit: Option<String>,

    /// Search window in minutes (30-720)
    pub duration: Option<String>,

    /// Optional start of the window (RFC 3339); ignored if unparseable
    pub when: Option<String>,
}

impl LongestDirectQuery {
    /// Validate the parameters and turn them into a finder request.
    ///
    /// The error is a human-readable message for a 400 response.
    pub fn into_request(self) -> Result<FindRequest, String> {
        let station = self
            .station
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "station is required".to_string())?
            .to_string();

        let limit = parse_in_range("limit", self.limit.as_deref(), DEFAULT_LIMIT, LIMIT_RANGE)?;
        let duration = parse_in_range(
            "duration",
            self.duration.as_deref(),
            DEFAULT_DURATION,
            DURATION_RANGE,
        )?;

        let mut request = FindRequest::new(station, limit, duration);

        // An unreadable start time means "now", like any other bad timestamp
        match parse_timestamp(self.when.as_deref()) {
            Some(when) => request = request.at(when),
            None => {
                if let Some(raw) = self.when.as_deref().filter(|s| !s.trim().is_empty()) {
                    debug!(when = raw, "ignoring unparseable start time");
                }
            }
        }

        Ok(request)
    }
}

/// Parse an optional integer parameter, checking it against `range`.
fn parse_in_range<T>(
    name: &str,
    raw: Option<&str>,
    default: T,
    range: std::ops::RangeInclusive<T>,
) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display,
{
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };

    let value: T = raw
        .parse()
        .map_err(|_| format!("Invalid {name}: {raw}"))?;

    if !range.contains(&value) {
        return Err(format!(
            "{name} must be between {} and {}",
            range.start(),
            range.end()
        ));
    }

    Ok(value)
}

/// A station in a connection record.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StationInfo {
    pub id: String,
    pub name: String,
}

impl From<&Station> for StationInfo {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.as_str().to_string(),
            name: station.name.clone(),
        }
    }
}

/// One direct connection in the response.
#[derive(Debug, Serialize)]
pub struct ConnectionResult {
    /// Line name, e.g. "RE 5"
    pub line_name: String,

    /// Product category, e.g. "regionalExpress"
    pub product: String,

    /// Headsign; empty when unknown
    pub direction: String,

    pub from_station: StationInfo,
    pub to_station: StationInfo,

    /// Departure at the origin (RFC 3339)
    pub departure: String,

    /// Arrival at the terminus (RFC 3339)
    pub arrival: String,

    pub duration_minutes: i64,
    pub stops_after_origin: usize,

    /// Provider trip reference
    pub trip_id: String,
}

impl From<&Connection> for ConnectionResult {
    fn from(connection: &Connection) -> Self {
        Self {
            line_name: connection.line_name.clone(),
            product: connection.product.clone(),
            direction: connection.direction.clone(),
            from_station: StationInfo::from(&connection.from_station),
            to_station: StationInfo::from(&connection.to_station),
            departure: connection.departure.to_rfc3339(),
            arrival: connection.arrival.to_rfc3339(),
            duration_minutes: connection.duration_minutes,
            stops_after_origin: connection.stops_after_origin,
            trip_id: connection.trip_ref.as_str().to_string(),
        }
    }
}

/// Service description returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            title: "Longest Direct Regional Trains",
            description: "Gibt die längsten durchgehenden Regionalzug-Verbindungen (RE/RB/S) \
                          ab einem Startbahnhof zurück, basierend auf v6.db.transport.rest.",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
