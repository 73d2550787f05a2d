//! Departure board entries.

use std::fmt;

/// Error returned when parsing an empty trip reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trip reference: must not be empty")]
pub struct InvalidTripRef;

/// Provider-assigned reference to one trip (a HAFAS trip id).
///
/// Trip ids are opaque and may contain characters such as `|` and `#`
/// that must be percent-encoded before use in a URL path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TripRef(String);

impl TripRef {
    pub fn parse(s: &str) -> Result<Self, InvalidTripRef> {
        if s.trim().is_empty() {
            return Err(InvalidTripRef);
        }
        Ok(TripRef(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TripRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripRef({})", self.0)
    }
}

impl fmt::Display for TripRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Line metadata as reported on a departure board.
///
/// Every field is optional; the provider omits what it does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInfo {
    /// Display name, e.g. "RE 5"
    pub name: Option<String>,
    /// Product category, e.g. "regionalExpress"
    pub product: Option<String>,
    /// Transport mode, e.g. "train"
    pub mode: Option<String>,
}

/// A candidate departure from the origin station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub trip_ref: TripRef,
    pub line: LineInfo,
    /// Headsign / direction text, if reported
    pub direction: Option<String>,
}

impl Departure {
    pub fn new(trip_ref: TripRef, line: LineInfo) -> Self {
        Self {
            trip_ref,
            line,
            direction: None,
        }
    }

    /// Set the direction (builder style).
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_ref_keeps_raw_text() {
        let raw = "1|300484|0|80|29112025";
        let trip = TripRef::parse(raw).unwrap();
        assert_eq!(trip.as_str(), raw);
        assert_eq!(trip.to_string(), raw);
    }

    #[test]
    fn trip_ref_rejects_blank() {
        assert_eq!(TripRef::parse(""), Err(InvalidTripRef));
        assert_eq!(TripRef::parse("  "), Err(InvalidTripRef));
    }

    #[test]
    fn departure_builder() {
        let dep = Departure::new(TripRef::parse("t1").unwrap(), LineInfo::default())
            .with_direction("Trier Hbf");
        assert_eq!(dep.direction.as_deref(), Some("Trier Hbf"));
        assert!(dep.line.name.is_none());
    }
}
