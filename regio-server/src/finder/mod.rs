//! Longest direct regional rides from a station.
//!
//! This module implements the core search: given a station, find the
//! longest rides on regional trains that need no change, one per route,
//! ranked by duration.
//!
//! Every departure (up to a cap) is expanded into its full stop sequence.
//! The ride always runs to the trip's terminus, so the duration is measured
//! from the origin's departure to the last stop's arrival.

mod aggregate;
mod config;
mod derive;
mod search;


pub use aggregate::aggregate;
pub use config::FinderConfig;
pub use derive::{DEFAULT_PRODUCT, SkipReason, UNKNOWN_LINE, derive_connection};
pub use search::{
    DepartureQuery, FindRequest, FindResult, Finder, FinderError, TransitProvider,
};
