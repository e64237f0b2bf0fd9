//! Outbound HTTP client used to forward requests to backends.

use std::time::{Duration, Instant};

use actix_web::http::header::{HeaderValue as ActixHeaderValue, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{redirect, Client, Method};
use tracing::{debug, info, warn};

use super::classify::ForwardError;
use crate::config::Backend;
use crate::error::AppError;

/// Shared, pooled client for all backends.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    timeout: Option<Duration>,
}

impl ProxyClient {
    /// Build the client. `None` leaves forwarded requests unbounded in time.
    pub fn new(timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder()
            // Backend redirects are relayed to the caller, not followed
            .redirect(redirect::Policy::none())
            .no_proxy()
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Duration::from_secs(90));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Send `request` to `backend` and buffer the whole response.
    ///
    /// Any status the backend answers with is a success here.
    pub async fn forward(
        &self,
        backend: &Backend,
        request: ForwardRequest,
    ) -> Result<ForwardResponse, ForwardError> {
        let id = backend.id();
        let url = backend.url_for(&request.path, request.query.as_deref());
        let started = Instant::now();

        debug!(backend = %id, method = %request.method, url = %url, "forwarding request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(|e| {
            let err = ForwardError::from_transport(id, &e);
            warn!(backend = %id, error = %e, "backend request failed");
            err
        })?;

        let status = response.status().as_u16();
        let content_type = response.headers().get(reqwest::header::CONTENT_TYPE).cloned();

        let body = response.bytes().await.map_err(|e| {
            warn!(backend = %id, error = %e, "failed to read backend response");
            ForwardError::from_transport(id, &e)
        })?;

        info!(
            backend = %id,
            status = status,
            duration_ms = started.elapsed().as_millis() as u64,
            "backend responded"
        );

        Ok(ForwardResponse {
            status,
            content_type,
            body,
        })
    }
}

/// A request ready to send to a backend.
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    /// Backend path, already rendered from the route template
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A fully buffered backend response.
#[derive(Debug)]
pub struct ForwardResponse {
    pub status: u16,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl ForwardResponse {
    /// Relay status, content type and body to the caller unchanged.
    pub fn into_http_response(self) -> Result<HttpResponse, AppError> {
        let status = StatusCode::from_u16(self.status).map_err(|_| {
            AppError::unexpected(format!("backend returned invalid status {}", self.status))
        })?;

        let mut response = HttpResponse::build(status);
        if let Some(value) = self
            .content_type
            .and_then(|v| ActixHeaderValue::from_bytes(v.as_bytes()).ok())
        {
            response.insert_header((CONTENT_TYPE, value));
        }

        Ok(response.body(self.body))
    }
}
