//! Conversion from transport.rest DTOs to domain types.
//!
//! Records that cannot be turned into valid domain values are skipped with a
//! debug log rather than failing the whole response.

use serde_json::Value;
use tracing::debug;

use crate::domain::{
    Departure, LineInfo, Station, StationId, StopSequence, Stopover, TripRef, parse_timestamp,
};

use super::types::{
    DepartureDto, LineDto, StationDto, StationsResponse, StopoverDto, TripDto,
};

/// Fallback display name for stops the provider did not name.
pub const UNKNOWN_NAME: &str = "Unbekannt";

/// Render a JSON id (string or number) as text.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Treat empty strings the same as missing ones.
fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Pick the best match from a station search response.
///
/// The first entry wins. For keyed responses the map key is the station id;
/// the name falls back to the search query when the provider omits it.
pub fn first_station(response: StationsResponse, query: &str) -> Option<Station> {
    let (id, dto) = match response {
        StationsResponse::Keyed(map) => {
            let (key, value) = map.into_iter().next()?;
            let dto: StationDto = serde_json::from_value(value).unwrap_or_default();
            (Some(key), dto)
        }
        StationsResponse::List(list) => {
            let dto = list.into_iter().next()?;
            (dto.id.as_ref().and_then(id_text), dto)
        }
        StationsResponse::Other(_) => return None,
    };

    let id = StationId::parse(&id?).ok()?;
    let name = non_empty(&dto.name).unwrap_or_else(|| query.to_string());
    Some(Station::new(id, name))
}

/// Convert line metadata. Only an empty JSON object counts as absent;
/// missing display fields are filled in later with fallbacks.
fn convert_line(line: &LineDto) -> Option<LineInfo> {
    if line.is_empty() {
        return None;
    }

    let text = |s: Option<&str>| s.filter(|s| !s.trim().is_empty()).map(str::to_string);
    Some(LineInfo {
        name: text(line.name()),
        product: text(line.product()),
        mode: text(line.mode()),
    })
}

/// Convert one departure board entry.
///
/// Returns `None` for entries without a trip id or without line metadata.
pub fn convert_departure(dto: &DepartureDto) -> Option<Departure> {
    let trip_ref = TripRef::parse(dto.trip_id.as_deref()?).ok()?;
    let line = convert_line(dto.line.as_ref()?)?;

    let mut departure = Departure::new(trip_ref, line);
    departure.direction = non_empty(&dto.direction);
    Some(departure)
}

/// Convert a departure board, preserving upstream order.
pub fn convert_departures(dtos: &[DepartureDto]) -> Vec<Departure> {
    dtos.iter()
        .enumerate()
        .filter_map(|(idx, dto)| {
            let converted = convert_departure(dto);
            if converted.is_none() {
                debug!(
                    index = idx,
                    trip_id = ?dto.trip_id,
                    "skipping departure without trip id or line"
                );
            }
            converted
        })
        .collect()
}

fn convert_stopover(index: usize, dto: &StopoverDto) -> Stopover {
    let stop = dto.stop.as_ref();
    let id = stop
        .and_then(|s| s.id.as_ref())
        .and_then(id_text)
        .and_then(|s| StationId::parse(&s).ok());

    let mut stopover = match id {
        Some(id) => {
            let name = stop
                .and_then(|s| non_empty(&s.name))
                .unwrap_or_else(|| UNKNOWN_NAME.to_string());
            Stopover::new(Station::new(id, name))
        }
        None => {
            debug!(index, "stopover without station id");
            Stopover::unidentified()
        }
    };

    stopover.planned_arrival = parse_timestamp(dto.planned_arrival.as_deref());
    stopover.arrival = parse_timestamp(dto.arrival.as_deref());
    stopover.planned_departure = parse_timestamp(dto.planned_departure.as_deref());
    stopover.departure = parse_timestamp(dto.departure.as_deref());
    stopover
}

/// Convert a trip to its stop sequence.
///
/// Unparseable timestamps become `None`. A stop without a station id keeps
/// its position but can never be matched as origin or used as terminus.
pub fn convert_trip(trip: &TripDto) -> StopSequence {
    trip.stopovers
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(idx, dto)| convert_stopover(idx, dto))
        .collect::<Vec<_>>()
        .into()
}
