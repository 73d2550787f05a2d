//! Longest direct regional trains.
//!
//! A small web service that answers: "Starting at this station, which
//! regional train (RE/RB/S) rides longest without changing?"

pub mod domain;
pub mod finder;
pub mod hafas;
pub mod web;
