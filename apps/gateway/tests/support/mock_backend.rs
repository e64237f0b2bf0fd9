//! A real HTTP backend for forwarding tests.
//!
//! Bound to an ephemeral port so the gateway's reqwest client talks to it
//! over a socket exactly as it would in production.

use std::collections::BTreeMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::header::LOCATION;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use bytes::Bytes;
use serde_json::json;

/// Paths with canned behavior; everything else is echoed back.
pub const NOT_FOUND_PATH: &str = "/api/goals/missing";
pub const FAILING_PATH: &str = "/api/goals/broken";
pub const REDIRECT_PATH: &str = "/api/goals/moved";
pub const SLOW_PATH: &str = "/api/goals/slow";

pub const SLOW_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct MockBackend {
    pub url: String,
    hits: Arc<AtomicUsize>,
    handle: ServerHandle,
}

impl MockBackend {
    /// Number of requests the backend has received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn handle(req: HttpRequest, body: Bytes, hits: web::Data<Arc<AtomicUsize>>) -> HttpResponse {
    hits.fetch_add(1, Ordering::SeqCst);

    match req.path() {
        NOT_FOUND_PATH => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        FAILING_PATH => HttpResponse::InternalServerError()
            .content_type("text/plain")
            .body("backend exploded"),
        REDIRECT_PATH => HttpResponse::Found()
            .insert_header((LOCATION, "/api/goals"))
            .finish(),
        SLOW_PATH => {
            tokio::time::sleep(SLOW_DELAY).await;
            HttpResponse::Ok().json(json!({ "slow": true }))
        }
        _ => echo(&req, &body),
    }
}

/// Describe the request as the backend saw it.
fn echo(req: &HttpRequest, body: &Bytes) -> HttpResponse {
    let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in req.headers() {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    HttpResponse::Ok().json(json!({
        "method": req.method().as_str(),
        "path": req.path(),
        "query": req.query_string(),
        "headers": headers,
        "body": String::from_utf8_lossy(body),
    }))
}

/// Start the mock backend on `127.0.0.1:0`.
pub async fn start_mock_backend() -> Result<MockBackend, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_data = web::Data::new(hits.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(hits_data.clone())
            .default_service(web::to(handle))
    })
    .workers(1)
    .disable_signals()
    .listen(listener)?
    .run();

    let handle = server.handle();
    tokio::spawn(server);

    Ok(MockBackend {
        url: format!("http://{addr}"),
        hits,
        handle,
    })
}

/// A URL nothing is listening on.
///
/// The port is taken from a listener that is dropped immediately, so
/// connections are refused.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener
        .local_addr()
        .expect("local addr of ephemeral listener")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
