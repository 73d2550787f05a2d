use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use regio_server::finder::FinderConfig;
use regio_server::hafas::{DEFAULT_BASE_URL, HafasClient, HafasConfig};
use regio_server::web::{AppState, DEFAULT_CORS_ORIGINS, create_router};

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "regio_server=info,tower_http=info";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

fn init_logger() {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(filter) => EnvFilter::try_new(&filter).unwrap_or_else(|err| {
            eprintln!(
                "invalid {}, falling back to '{DEFAULT_LOG_FILTER}' - {err}",
                EnvFilter::DEFAULT_ENV
            );
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }),
        Err(_) => EnvFilter::new(DEFAULT_LOG_FILTER),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}

/// Read a numeric setting, falling back to `default` when unset or invalid.
fn env_number<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, %default, "ignoring invalid setting");
            default
        }),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    init_logger();

    let base_url = std::env::var("DB_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let defaults = FinderConfig::default();
    let max_concurrent = env_number("MAX_CONCURRENT_FETCHES", defaults.max_concurrent_trips);
    let finder_config = FinderConfig::default()
        .with_max_trips(env_number("MAX_TRIPS", defaults.max_trips))
        .with_max_concurrent_trips(max_concurrent);

    let hafas_config = HafasConfig::new(&base_url)
        .with_max_concurrent(max_concurrent)
        .with_trip_timeout(finder_config.trip_timeout_secs);
    let hafas = HafasClient::new(hafas_config).expect("Failed to create transport.rest client");

    let cors_origins: Vec<String> = match std::env::var("CORS_ORIGINS") {
        Ok(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
    };

    let state = AppState::new(hafas, finder_config.clone());
    let app = create_router(state, &cors_origins);

    let addr: SocketAddr = bind_addr.parse().expect("BIND_ADDR must be host:port");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    info!(
        %addr,
        upstream = %base_url,
        max_trips = finder_config.max_trips,
        cors_origins = cors_origins.len(),
        "longest direct regional trains listening"
    );
    info!("GET  /health          - health check");
    info!("GET  /longest-direct  - longest direct regional rides from a station");

    axum::serve(listener, app).await.expect("Server error");
}
