//! Derivation of a direct connection from one trip.
//!
//! Given the origin station, a departure from it and that departure's full
//! stop sequence, build the ride from the origin to the trip's terminus.
//! Every rejection is reported as a `SkipReason` so callers can log it;
//! none of them is an error for the request as a whole.

use crate::domain::{Connection, Departure, Station, StopSequence, floor_minutes_between};

/// Line name used when the provider does not name the line.
pub const UNKNOWN_LINE: &str = "Unbekannt";

/// Product used when neither the line's product nor its mode is known.
pub const DEFAULT_PRODUCT: &str = "regional";

/// Why a trip produced no connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The origin does not appear in the trip's own stop list
    #[error("origin station not in stop sequence")]
    OriginNotInTrip,

    /// The origin is the trip's last (or only) stop
    #[error("no stops after origin")]
    NoRideAfterOrigin,

    /// The trip's last stop carries no station identity
    #[error("terminus has no station id")]
    UnidentifiedTerminus,

    /// Neither realtime nor planned departure at the origin
    #[error("missing departure time at origin")]
    MissingDepartureTime,

    /// Neither realtime nor planned arrival at the terminus
    #[error("missing arrival time at terminus")]
    MissingArrivalTime,

    /// Arrival is not at least one whole minute after departure
    #[error("non-positive duration ({0} min)")]
    NonPositiveDuration(i64),
}

/// Derive the direct connection from `origin` to the terminus of a trip.
///
/// The destination is always the last stop of `sequence`, regardless of
/// how many stops lie in between. The first occurrence of the origin in
/// the sequence is used as the boarding point.
pub fn derive_connection(
    origin: &Station,
    departure: &Departure,
    sequence: &StopSequence,
) -> Result<Connection, SkipReason> {
    let origin_idx = sequence
        .position_of(&origin.id)
        .ok_or(SkipReason::OriginNotInTrip)?;

    if sequence.is_terminal(origin_idx) {
        return Err(SkipReason::NoRideAfterOrigin);
    }

    let (Some(origin_stop), Some(terminus)) = (sequence.get(origin_idx), sequence.last()) else {
        return Err(SkipReason::OriginNotInTrip);
    };

    let departure_time = origin_stop
        .effective_departure()
        .ok_or(SkipReason::MissingDepartureTime)?;
    let arrival_time = terminus
        .effective_arrival()
        .ok_or(SkipReason::MissingArrivalTime)?;

    let duration_minutes = floor_minutes_between(departure_time, arrival_time);
    if duration_minutes <= 0 {
        return Err(SkipReason::NonPositiveDuration(duration_minutes));
    }

    let to_station = terminus
        .station
        .clone()
        .ok_or(SkipReason::UnidentifiedTerminus)?;

    let line = &departure.line;
    let line_name = line.name.clone().unwrap_or_else(|| UNKNOWN_LINE.to_string());
    let product = line
        .product
        .clone()
        .or_else(|| line.mode.clone())
        .unwrap_or_else(|| DEFAULT_PRODUCT.to_string());

    Ok(Connection {
        line_name,
        product,
        direction: departure.direction.clone().unwrap_or_default(),
        from_station: origin.clone(),
        to_station,
        departure: departure_time,
        arrival: arrival_time,
        duration_minutes,
        stops_after_origin: sequence.len() - origin_idx.0 - 1,
        trip_ref: departure.trip_ref.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineInfo, StationId, Stopover, Timestamp, TripRef, parse_timestamp};

    fn ts(hhmm: &str) -> Timestamp {
        parse_timestamp(Some(&format!("2025-11-29T{hhmm}:00+01:00"))).unwrap()
    }

    fn station(id: &str) -> Station {
        Station::new(StationId::parse(id).unwrap(), format!("Station {id}"))
    }

    /// Build a stopover from (id, planned arrival, planned departure); "" = absent.
    fn stop(id: &str, arr: &str, dep: &str) -> Stopover {
        let mut s = Stopover::new(station(id));
        if !arr.is_empty() {
            s.planned_arrival = Some(ts(arr));
        }
        if !dep.is_empty() {
            s.planned_departure = Some(ts(dep));
        }
        s
    }

    fn departure(line: &str, direction: &str) -> Departure {
        Departure::new(
            TripRef::parse("trip-1").unwrap(),
            LineInfo {
                name: Some(line.to_string()),
                product: Some("regionalExpress".to_string()),
                mode: Some("train".to_string()),
            },
        )
        .with_direction(direction)
    }

    #[test]
    fn koblenz_to_terminus() {
        let origin = Station::new(StationId::parse("X").unwrap(), "Koblenz Hbf");
        let seq = StopSequence::new(vec![
            stop("X", "", "08:00"),
            stop("Y", "", ""),
            stop("Z", "09:30", ""),
        ]);

        let conn = derive_connection(&origin, &departure("RE 5", "Trier"), &seq).unwrap();

        assert_eq!(conn.duration_minutes, 90);
        assert_eq!(conn.stops_after_origin, 2);
        assert_eq!(conn.to_station.id.as_str(), "Z");
        assert_eq!(conn.from_station.name, "Koblenz Hbf");
        assert_eq!(conn.line_name, "RE 5");
        assert_eq!(conn.product, "regionalExpress");
        assert_eq!(conn.direction, "Trier");
        assert_eq!(conn.trip_ref.as_str(), "trip-1");
    }

    #[test]
    fn origin_mid_trip() {
        let seq = StopSequence::new(vec![
            stop("A", "", "07:00"),
            stop("B", "07:20", "07:22"),
            stop("C", "07:40", "07:41"),
            stop("D", "08:05", ""),
        ]);

        let conn = derive_connection(&station("B"), &departure("RB 81", "D"), &seq).unwrap();
        assert_eq!(conn.departure, ts("07:22"));
        assert_eq!(conn.arrival, ts("08:05"));
        assert_eq!(conn.duration_minutes, 43);
        assert_eq!(conn.stops_after_origin, 2);
    }

    #[test]
    fn realtime_times_take_precedence() {
        let mut origin_stop = stop("A", "", "08:00");
        origin_stop.departure = Some(ts("08:05"));
        let mut terminus = stop("B", "09:00", "");
        terminus.arrival = Some(ts("09:20"));
        let seq = StopSequence::new(vec![origin_stop, terminus]);

        let conn = derive_connection(&station("A"), &departure("RE 1", "B"), &seq).unwrap();
        assert_eq!(conn.duration_minutes, 75);
    }

    #[test]
    fn first_occurrence_of_origin_is_used() {
        // Loop line: A -> B -> A -> C
        let seq = StopSequence::new(vec![
            stop("A", "", "08:00"),
            stop("B", "08:10", "08:11"),
            stop("A", "08:20", "08:21"),
            stop("C", "08:40", ""),
        ]);

        let conn = derive_connection(&station("A"), &departure("S 1", "C"), &seq).unwrap();
        assert_eq!(conn.duration_minutes, 40);
        assert_eq!(conn.stops_after_origin, 3);
    }

    #[test]
    fn origin_missing_from_trip() {
        let seq = StopSequence::new(vec![stop("A", "", "08:00"), stop("B", "09:00", "")]);
        assert_eq!(
            derive_connection(&station("Q"), &departure("RE 1", "B"), &seq),
            Err(SkipReason::OriginNotInTrip)
        );
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &StopSequence::default()),
            Err(SkipReason::OriginNotInTrip)
        );
    }

    #[test]
    fn origin_is_terminus() {
        let seq = StopSequence::new(vec![stop("A", "", "08:00"), stop("B", "09:00", "")]);
        assert_eq!(
            derive_connection(&station("B"), &departure("RE 1", "B"), &seq),
            Err(SkipReason::NoRideAfterOrigin)
        );
    }

    #[test]
    fn origin_is_only_stop() {
        let seq = StopSequence::new(vec![stop("A", "", "08:00")]);
        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &seq),
            Err(SkipReason::NoRideAfterOrigin)
        );
    }

    #[test]
    fn missing_times() {
        let seq = StopSequence::new(vec![stop("A", "", ""), stop("B", "09:00", "")]);
        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &seq),
            Err(SkipReason::MissingDepartureTime)
        );

        let seq = StopSequence::new(vec![stop("A", "", "08:00"), stop("B", "", "")]);
        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &seq),
            Err(SkipReason::MissingArrivalTime)
        );
    }

    #[test]
    fn non_positive_duration_rejected() {
        let seq = StopSequence::new(vec![stop("A", "", "08:00"), stop("B", "08:00", "")]);
        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &seq),
            Err(SkipReason::NonPositiveDuration(0))
        );

        let seq = StopSequence::new(vec![stop("A", "", "09:00"), stop("B", "08:00", "")]);
        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &seq),
            Err(SkipReason::NonPositiveDuration(-60))
        );
    }

    #[test]
    fn sub_minute_ride_is_rejected() {
        let mut terminus = stop("B", "", "");
        terminus.planned_arrival = parse_timestamp(Some("2025-11-29T08:00:45+01:00"));
        let seq = StopSequence::new(vec![stop("A", "", "08:00"), terminus]);
        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &seq),
            Err(SkipReason::NonPositiveDuration(0))
        );
    }

    #[test]
    fn unidentified_intermediate_stop_is_passed_over() {
        let seq = StopSequence::new(vec![
            stop("A", "", "08:00"),
            Stopover::unidentified(),
            stop("C", "09:10", ""),
        ]);

        let conn = derive_connection(&station("A"), &departure("RB 23", "C"), &seq).unwrap();
        assert_eq!(conn.to_station.id.as_str(), "C");
        assert_eq!(conn.duration_minutes, 70);
        assert_eq!(conn.stops_after_origin, 2);
    }

    #[test]
    fn unidentified_terminus_is_skipped() {
        let mut terminus = Stopover::unidentified();
        terminus.planned_arrival = Some(ts("09:00"));
        let seq = StopSequence::new(vec![stop("A", "", "08:00"), terminus]);

        assert_eq!(
            derive_connection(&station("A"), &departure("RE 1", ""), &seq),
            Err(SkipReason::UnidentifiedTerminus)
        );
    }

    #[test]
    fn line_fallbacks() {
        let seq = StopSequence::new(vec![stop("A", "", "08:00"), stop("B", "09:00", "")]);

        let bare = Departure::new(TripRef::parse("t").unwrap(), LineInfo::default());
        let conn = derive_connection(&station("A"), &bare, &seq).unwrap();
        assert_eq!(conn.line_name, UNKNOWN_LINE);
        assert_eq!(conn.product, DEFAULT_PRODUCT);
        assert_eq!(conn.direction, "");

        let mode_only = Departure::new(
            TripRef::parse("t").unwrap(),
            LineInfo {
                name: None,
                product: None,
                mode: Some("train".to_string()),
            },
        );
        let conn = derive_connection(&station("A"), &mode_only, &seq).unwrap();
        assert_eq!(conn.product, "train");
    }
}
