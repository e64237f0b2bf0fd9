//! Forwarding of gateway requests to backend services.

pub mod classify;
pub mod client;
pub mod headers;

pub use classify::ForwardError;
pub use client::{ForwardRequest, ForwardResponse, ProxyClient};
pub use headers::outbound_headers;
