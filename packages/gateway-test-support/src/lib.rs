//! Gateway test support utilities
//!
//! This crate provides utilities shared by the gateway's integration tests:
//! unified logging initialization and error envelope assertions.

pub mod envelope;
pub mod logging;
