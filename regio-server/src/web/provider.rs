//! Transit provider backed by the transport.rest client.

use tracing::{debug, warn};

use crate::domain::{Departure, Station, StopSequence, TripRef};
use crate::finder::{DepartureQuery, FinderError, TransitProvider};
use crate::hafas::{HafasClient, HafasError};

impl From<HafasError> for FinderError {
    fn from(e: HafasError) -> Self {
        FinderError::Upstream(e.to_string())
    }
}

impl TransitProvider for HafasClient {
    async fn search_station(&self, query: &str) -> Result<Option<Station>, FinderError> {
        Ok(HafasClient::search_station(self, query).await?)
    }

    async fn departures(
        &self,
        station: &Station,
        query: &DepartureQuery,
    ) -> Result<Vec<Departure>, FinderError> {
        let departures = HafasClient::departures(
            self,
            &station.id,
            query.when,
            query.window_minutes,
            query.max_results,
        )
        .await?;
        Ok(departures)
    }

    async fn trip(&self, trip: &TripRef) -> Option<StopSequence> {
        match HafasClient::trip(self, trip).await {
            Ok(sequence) => Some(sequence),
            Err(HafasError::NotFound { .. }) => {
                debug!(%trip, "trip not found");
                None
            }
            Err(e) => {
                warn!(%trip, error = %e, timeout = e.is_timeout(), "trip lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hafas_errors_become_upstream() {
        let err: FinderError = HafasError::RateLimited.into();
        assert!(matches!(err, FinderError::Upstream(_)));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn api_error_message_is_kept() {
        let err: FinderError = HafasError::ApiError {
            status: 503,
            message: "maintenance".to_string(),
        }
        .into();
        assert!(err.to_string().contains("maintenance"));
    }

    mod upstream {
        use std::time::Duration;

        use axum::{Json, Router, extract::Path, routing::get};
        use serde_json::{Value, json};

        use crate::finder::{FindRequest, Finder, FinderConfig};
        use crate::hafas::{HafasClient, HafasConfig};

        async fn stations() -> Json<Value> {
            Json(json!({
                "8000206": {"type": "stop", "id": "8000206", "name": "Koblenz Hbf"}
            }))
        }

        async fn departures() -> Json<Value> {
            let departures: Vec<Value> = (0..4)
                .map(|i| {
                    json!({
                        "tripId": format!("t{i}"),
                        "line": {"type": "line", "name": format!("RB {i}"), "product": "regional"},
                        "direction": "Trier Hbf"
                    })
                })
                .collect();
            Json(json!({ "departures": departures }))
        }

        async fn trip(Path(id): Path<String>) -> Json<Value> {
            tokio::time::sleep(Duration::from_millis(400)).await;
            Json(json!({"trip": {"id": id, "stopovers": [
                {"stop": {"id": "8000206", "name": "Koblenz Hbf"},
                 "plannedDeparture": "2025-11-29T08:00:00+01:00"},
                {"stop": {"id": "8000322", "name": "Trier Hbf"},
                 "plannedArrival": "2025-11-29T09:30:00+01:00"}
            ]}}))
        }

        /// Serve a fake transport.rest on an ephemeral port.
        async fn spawn_upstream() -> String {
            let app = Router::new()
                .route("/stations", get(stations))
                .route("/stops/:id/departures", get(departures))
                .route("/trips/:id", get(trip));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
            format!("http://{addr}")
        }

        #[tokio::test]
        async fn slow_trips_survive_a_small_request_limit() {
            let base_url = spawn_upstream().await;
            let client =
                HafasClient::new(HafasConfig::new(base_url).with_max_concurrent(1)).unwrap();

            // Each trip answers in 0.4 s; four of them back to back would
            // take 1.6 s, well past the 1 s per-trip timeout
            let config = FinderConfig::new(80, 200, 1);
            let result = Finder::new(&client, &config)
                .find(&FindRequest::new("Koblenz Hbf", 10, 240))
                .await
                .unwrap();

            let trips: Vec<_> = result
                .connections
                .iter()
                .map(|c| c.trip_ref.as_str())
                .collect();
            assert_eq!(trips, vec!["t0", "t1", "t2", "t3"]);
            assert!(result.connections.iter().all(|c| c.duration_minutes == 90));
        }
    }
}
