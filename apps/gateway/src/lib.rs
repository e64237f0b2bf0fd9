#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

pub use app::create_app;
pub use auth::{mint_access_token, verify_access_token, Claims, Identity};
pub use config::{BackendId, Config, RuntimeEnv};
pub use error::AppError;
pub use state::{build_state, AppState, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
