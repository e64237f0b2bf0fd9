use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::config::Backends;
use crate::proxy::ProxyClient;
use crate::routes::table::RouteTable;

/// Application state shared by every request.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Downstream service base URLs
    pub backends: Backends,
    /// Public route → backend mapping
    pub routes: Arc<RouteTable>,
    /// Shared outbound HTTP client
    pub proxy: ProxyClient,
    /// Upper bound on inbound request bodies, in bytes
    pub max_payload_size: usize,
}
