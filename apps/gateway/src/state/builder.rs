use std::sync::Arc;
use std::time::Duration;

use super::app_state::AppState;
use super::security_config::SecurityConfig;
use crate::config::{Backends, Config};
use crate::error::AppError;
use crate::proxy::ProxyClient;
use crate::routes::table::RouteTable;

const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    backends: Option<Backends>,
    routes: Option<RouteTable>,
    upstream_timeout: Option<Duration>,
    max_payload_size: usize,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            backends: None,
            routes: None,
            upstream_timeout: None,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }

    /// Take security, backends and limits from a loaded `Config`.
    pub fn with_config(self, config: &Config) -> Result<Self, AppError> {
        let security = SecurityConfig::new(config.jwt_secret.as_bytes())?;
        Ok(self
            .with_security(security)
            .with_backends(config.backends.clone())
            .with_upstream_timeout(config.upstream_timeout)
            .with_max_payload_size(config.max_payload_size))
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub fn with_backends(mut self, backends: Backends) -> Self {
        self.backends = Some(backends);
        self
    }

    /// Replace the gateway route table (tests use this for custom tables).
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn with_max_payload_size(mut self, limit: usize) -> Self {
        self.max_payload_size = limit;
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let security = self
            .security_config
            .ok_or_else(|| AppError::config("security configuration is required"))?;
        let backends = self
            .backends
            .ok_or_else(|| AppError::config("backend configuration is required"))?;
        let proxy = ProxyClient::new(self.upstream_timeout)?;

        Ok(AppState {
            security,
            backends,
            routes: Arc::new(self.routes.unwrap_or_else(RouteTable::gateway)),
            proxy,
            max_payload_size: self.max_payload_size,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
