//! Deduplication and ranking of derived connections.
//!
//! Several trips in the search window usually run the same route (same
//! line, direction and terminus). Only the longest run of each route is
//! kept, and routes are ranked longest first.

use std::collections::HashMap;

use crate::domain::{Connection, RouteKey};

/// Fold candidates into one connection per route, longest first.
///
/// Candidates must arrive in the order their departures were listed:
/// - a later candidate replaces the kept one only if strictly longer
/// - equal durations keep the order in which their routes were first seen
///
/// The result holds at most `limit` connections.
pub fn aggregate<I>(candidates: I, limit: usize) -> Vec<Connection>
where
    I: IntoIterator<Item = Connection>,
{
    let mut best: Vec<Connection> = Vec::new();
    let mut slots: HashMap<RouteKey, usize> = HashMap::new();

    for candidate in candidates {
        match slots.get(&candidate.route_key()) {
            Some(&slot) => {
                if candidate.duration_minutes > best[slot].duration_minutes {
                    best[slot] = candidate;
                }
            }
            None => {
                slots.insert(candidate.route_key(), best.len());
                best.push(candidate);
            }
        }
    }

    // Stable sort keeps first-seen order among equal durations
    best.sort_by(|a, b| b.duration_minutes.cmp(&a.duration_minutes));
    best.truncate(limit);
    best
}
