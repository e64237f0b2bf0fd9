//! JWT helpers for tests

use std::time::{Duration, SystemTime};

use gateway::auth::mint_access_token;
use gateway::state::SecurityConfig;

pub const TEST_SECRET: &str = "gateway_integration_test_secret";

pub fn security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes()).expect("non-empty secret")
}

/// Full Authorization header value for a fresh token.
pub fn bearer(id: &str, email: Option<&str>, role: Option<&str>) -> String {
    let token = mint_access_token(
        id,
        email,
        role,
        SystemTime::now(),
        Duration::from_secs(15 * 60),
        &security(),
    )
    .expect("should mint token successfully");
    format!("Bearer {token}")
}

/// A token that expired well outside the verifier's leeway.
pub fn expired_bearer(id: &str) -> String {
    let issued = SystemTime::now() - Duration::from_secs(60 * 60);
    let token = mint_access_token(
        id,
        None,
        None,
        issued,
        Duration::from_secs(15 * 60),
        &security(),
    )
    .expect("should mint expired token");
    format!("Bearer {token}")
}
