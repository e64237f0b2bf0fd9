//! Request dispatch: resolve, authenticate, forward, relay.

pub mod table;

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use bytes::BytesMut;
use futures_util::StreamExt;
use tracing::debug;

use crate::error::AppError;
use crate::middleware::identity::{authenticate, authorize};
use crate::proxy::{outbound_headers, ForwardRequest};
use crate::state::AppState;

pub const MSG_PAYLOAD_TOO_LARGE: &str = "Request body too large.";

pub fn configure(cfg: &mut web::ServiceConfig) {
    crate::health::configure(cfg);
    cfg.default_service(web::to(dispatch));
}

/// Handle every non-health request through the route table.
pub async fn dispatch(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let matched = state.routes.resolve(req.method(), req.path())?;
    let route = matched.route;
    req.extensions_mut().insert(route.backend);

    let identity = if route.requires_identity {
        let identity = authenticate(req.headers(), &state.security)?;
        req.extensions_mut().insert(identity.clone());
        Some(identity)
    } else {
        None
    };
    authorize(identity.as_ref(), route.allowed_roles)?;

    let body = read_body(payload, state.max_payload_size).await?;

    let request_id = req.extensions().get::<String>().cloned();
    let headers = outbound_headers(
        req.headers(),
        route.requires_identity,
        identity.as_ref(),
        request_id.as_deref(),
    )?;

    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|_| AppError::bad_request(format!("Unsupported method: {}", req.method())))?;

    let query = Some(req.query_string())
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    debug!(
        backend = %route.backend,
        pattern = route.pattern,
        upstream = %matched.upstream_path,
        user_id = identity.as_ref().map(|i| i.id.as_str()).unwrap_or(""),
        "route resolved"
    );

    let response = state
        .proxy
        .forward(
            state.backends.get(route.backend),
            ForwardRequest {
                method,
                path: matched.upstream_path,
                query,
                headers,
                body: body.freeze(),
            },
        )
        .await?;

    response.into_http_response()
}

/// Buffer the request body, rejecting anything above `limit` bytes.
async fn read_body(mut payload: web::Payload, limit: usize) -> Result<BytesMut, AppError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::payload_too_large(MSG_PAYLOAD_TOO_LARGE));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
