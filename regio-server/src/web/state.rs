//! Application state for the web layer.

use std::sync::Arc;

use crate::finder::FinderConfig;
use crate::hafas::HafasClient;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// transport.rest API client
    pub hafas: Arc<HafasClient>,

    /// Longest-direct finder configuration
    pub config: Arc<FinderConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(hafas: HafasClient, config: FinderConfig) -> Self {
        Self {
            hafas: Arc::new(hafas),
            config: Arc::new(config),
        }
    }
}
