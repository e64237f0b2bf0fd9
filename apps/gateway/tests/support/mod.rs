#![allow(dead_code)]

pub mod mock_backend;
pub mod test_state;
pub mod tokens;

pub use mock_backend::{start_mock_backend, unreachable_url, MockBackend};
pub use test_state::{state_for, state_with_timeout};
