//! Request/response logging for the HTTP surface.
//!
//! Every request outside [`SKIP_PATHS`] produces an "incoming request" record
//! before the handler runs and a "request completed" record after it. Records
//! go through the [`AccessLog`] queue, so logging never waits on the sink.
//! The middleware never changes the request body the handler sees, nor the
//! response it returns.

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;
use futures_util::stream::{self, StreamExt};
use serde_json::Value;

use super::access_log::{AccessLog, AccessRecord};
use super::redact::redact;

/// Probe endpoints that are never logged.
pub const SKIP_PATHS: &[&str] = &["/health", "/metrics"];

/// Largest request body captured for logging.
pub const MAX_CAPTURED_BODY: usize = 64 * 1024;

/// axum middleware: `middleware::from_fn_with_state(access_log, log_requests)`.
pub async fn log_requests(State(log): State<AccessLog>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if SKIP_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    let started = Instant::now();
    let method = request.method().clone();
    let query = request.uri().query().unwrap_or_default().to_string();
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let (request, body) = capture_body(request, &log).await;

    log.submit(AccessRecord::Request {
        method: method.to_string(),
        path: path.clone(),
        query,
        client_ip,
        body,
    });

    let response = next.run(request).await;

    log.submit(AccessRecord::Response {
        method: method.to_string(),
        path,
        status: response.status().as_u16(),
        duration_ms: started.elapsed().as_secs_f64() * 1000.0,
    });

    response
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn declared_length(request: &Request) -> Option<usize> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Buffer and parse the body of a POST/PUT/PATCH request.
///
/// Returns the request to forward (with the exact bytes read) and the
/// redacted JSON body, if any. Bodies longer than [`MAX_CAPTURED_BODY`],
/// declared or discovered while reading, are forwarded without being logged.
async fn capture_body(request: Request, log: &AccessLog) -> (Request, Option<Value>) {
    if !carries_body(request.method()) {
        return (request, None);
    }
    if declared_length(&request).is_some_and(|len| len == 0 || len > MAX_CAPTURED_BODY) {
        return (request, None);
    }

    let unparsed = |reason: String, request: &Request| AccessRecord::BodyUnparsed {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        reason,
    };

    let (parts, body) = request.into_parts();
    let bytes = match read_prefix(body, MAX_CAPTURED_BODY).await {
        Captured::Complete(bytes) if bytes.is_empty() => {
            return (Request::from_parts(parts, Body::empty()), None);
        }
        Captured::Complete(bytes) => bytes,
        Captured::Oversized(body) => return (Request::from_parts(parts, body), None),
        Captured::Failed(reason) => {
            // Body is consumed; forward an empty one.
            let request = Request::from_parts(parts, Body::empty());
            log.submit(unparsed(reason, &request));
            return (request, None);
        }
    };

    let parsed = parse_body(&bytes);
    let request = Request::from_parts(parts, Body::from(bytes));
    match parsed {
        Ok(value) => (request, Some(redact(&value))),
        Err(e) => {
            log.submit(unparsed(e.to_string(), &request));
            (request, None)
        }
    }
}

enum Captured {
    Complete(Bytes),
    /// Past the limit: the chunks already read, followed by the rest.
    Oversized(Body),
    Failed(String),
}

async fn read_prefix(body: Body, limit: usize) -> Captured {
    let mut rest = body.into_data_stream();
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut total = 0;
    while let Some(chunk) = rest.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return Captured::Failed(e.to_string()),
        };
        total += chunk.len();
        chunks.push(chunk);
        if total > limit {
            let read = stream::iter(chunks.into_iter().map(Ok::<_, axum::Error>));
            return Captured::Oversized(Body::from_stream(read.chain(rest)));
        }
    }
    match chunks.len() {
        0 => Captured::Complete(Bytes::new()),
        1 => Captured::Complete(chunks.swap_remove(0)),
        _ => Captured::Complete(Bytes::from(chunks.concat())),
    }
}

fn parse_body(bytes: &Bytes) -> serde_json::Result<Value> {
    serde_json::from_slice(bytes)
}
