use std::time::Duration;

use gateway::config::Backends;
use gateway::state::{build_state, AppState};

use super::tokens::security;

/// State forwarding both backends to the given base URLs.
pub fn state_for(auth_url: &str, goals_url: &str) -> AppState {
    state_with_timeout(auth_url, goals_url, None)
}

pub fn state_with_timeout(
    auth_url: &str,
    goals_url: &str,
    timeout: Option<Duration>,
) -> AppState {
    build_state()
        .with_security(security())
        .with_backends(Backends::new(auth_url, goals_url).expect("valid backend urls"))
        .with_upstream_timeout(timeout)
        .build()
        .expect("state should build")
}
