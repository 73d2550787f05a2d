//! transport.rest (HAFAS) client.
//!
//! This module provides an HTTP client for the `transport.rest` API, a REST
//! wrapper around Deutsche Bahn's HAFAS backend.
//!
//! Key characteristics of the API:
//! - Station ids are opaque strings (often numeric IBNRs), sometimes sent
//!   as JSON numbers
//! - Times are ISO 8601 with a UTC offset
//! - Departure boards only carry a trip id; the stop sequence of each trip
//!   needs a separate `/trips/{id}` request

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, HafasClient, HafasConfig};
pub use convert::UNKNOWN_NAME;
pub use error::HafasError;
pub use types::{
    DepartureDto, DeparturesResponse, LineDto, StationDto, StationsResponse, StopoverDto,
    TripDto, TripResponse,
};
