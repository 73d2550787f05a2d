//! Domain types for the longest-direct-ride finder.
//!
//! These types represent validated provider data. Identifiers enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity. Everything here is built per request and dropped with
//! the response.

mod connection;
mod departure;
mod station;
mod stopover;
mod time;

pub use connection::{Connection, RouteKey};
pub use departure::{Departure, InvalidTripRef, LineInfo, TripRef};
pub use station::{InvalidStationId, Station, StationId};
pub use stopover::{StopIndex, StopSequence, Stopover};
pub use time::{Timestamp, floor_minutes_between, parse_timestamp};
