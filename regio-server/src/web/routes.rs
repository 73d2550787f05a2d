//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

use crate::finder::{Finder, FinderError};

use super::dto::*;
use super::state::AppState;

/// Browser origins allowed to call the API when none are configured.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://localhost:3000",
    "http://localhost:4173",
    "http://127.0.0.1:8000",
    "http://localhost:8000",
    "https://cognifex.github.io",
    "https://cognifex.github.io/wnt-db",
];

/// Create the application router.
///
/// `cors_origins` is the browser origin allow-list; entries that are not
/// valid header values are skipped.
pub fn create_router<S: AsRef<str>>(state: AppState, cors_origins: &[S]) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/longest-direct", get(longest_direct))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// CORS for the allow-listed origins: any method and header, no credentials.
fn cors_layer<S: AsRef<str>>(origins: &[S]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            let origin = origin.as_ref().trim();
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Service description.
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Find the longest direct regional rides from a station.
async fn longest_direct(
    State(state): State<AppState>,
    Query(query): Query<LongestDirectQuery>,
) -> Result<Json<Vec<ConnectionResult>>, AppError> {
    let request = query
        .into_request()
        .map_err(|message| AppError::BadRequest { message })?;

    info!(
        station = %request.station,
        limit = request.limit,
        duration = request.window_minutes,
        "longest-direct request"
    );

    let finder = Finder::new(state.hafas.as_ref(), &state.config);
    let result = finder.find(&request).await.map_err(AppError::from)?;

    let connections = result
        .connections
        .iter()
        .map(ConnectionResult::from)
        .collect();

    Ok(Json(connections))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<FinderError> for AppError {
    fn from(e: FinderError) -> Self {
        match e {
            FinderError::InvalidRequest(message) => AppError::BadRequest { message },
            FinderError::Upstream(_) => AppError::BadGateway {
                message: e.to_string(),
            },
            _ if e.is_not_found() => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            info!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_map_to_404() {
        let err = AppError::from(FinderError::StationNotFound {
            query: "Atlantis".to_string(),
        });
        assert!(matches!(
            &err,
            AppError::NotFound { message } if message == "Kein Bahnhof gefunden für 'Atlantis'."
        ));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = AppError::from(FinderError::NoConnections);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_maps_to_502() {
        let err = AppError::from(FinderError::Upstream("timeout".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_request_maps_to_400() {
        let err = AppError::from(FinderError::InvalidRequest("limit".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_cors_origins_are_skipped() {
        // Must not panic on a value that is not a valid header
        let _ = cors_layer(&["http://localhost", "bad\norigin"]);
        let _ = cors_layer(DEFAULT_CORS_ORIGINS);
    }
}
