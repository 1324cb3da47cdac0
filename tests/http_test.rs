//! HTTP surface tests, driving the router in-process with `oneshot`.

#![cfg(feature = "server")]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use pack_service::server::access_log::AccessLog;
use pack_service::server::{AppState, router};
use pack_service::{MemoryCatalog, MetricsCollector, PackLookup};

const P1: &str = r#"[{
    "id": "p1",
    "name": "Single question",
    "author": "tester",
    "description": "one of everything",
    "rounds_count": 1,
    "questions_count": 1,
    "created_at": "2024-01-01T00:00:00Z",
    "rounds": [{
        "id": "r1", "round_number": 1, "name": "Round 1",
        "themes": [{
            "id": "t1", "name": "Theme 1",
            "questions": [{"id": "q1", "price": 100, "text": "2+2?", "answer": "4"}]
        }]
    }]
}]"#;

fn app() -> Router {
    metered_app().0
}

fn metered_app() -> (Router, Arc<MetricsCollector>) {
    let metrics = Arc::new(MetricsCollector::new().unwrap());
    let catalog = MemoryCatalog::from_json(P1).unwrap();
    let lookup = PackLookup::new(Arc::new(catalog), metrics.clone());
    let (access_log, _rx) = AccessLog::channel(64, metrics.clone());
    (router(AppState::new(lookup), access_log), metrics)
}

async fn scrape(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Sum of the samples of `name` whose labels include every `labels` pair.
fn sample(export: &str, name: &str, labels: &[(&str, &str)]) -> f64 {
    export
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter(|line| {
            line.strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('{') || rest.starts_with(' '))
        })
        .filter(|line| {
            labels
                .iter()
                .all(|(k, v)| line.contains(&format!("{k}=\"{v}\"")))
        })
        .filter_map(|line| line.rsplit(' ').next()?.parse::<f64>().ok())
        .sum()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn end_to_end_single_pack() {
    let app = app();

    let (status, list) = get(&app, "/packs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert_eq!(list["packs"][0]["id"], "p1");

    let (status, info) = get(&app, "/packs/p1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["rounds_count"], 1);
    assert_eq!(info["questions_count"], 1);
    assert_eq!(info["has_media"], false);
    assert!(info.get("rounds").is_none());

    let (status, content) = get(&app, "/packs/p1/content").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content["rounds"][0]["themes"][0]["questions"][0]["price"], 100);
    assert_eq!(content["rounds"][0]["round_number"], 1);

    let (status, _) = get(&app, "/packs/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn not_found_uses_error_body() {
    let (status, body) = get(&app(), "/packs/does-not-exist/content").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let (status, body) = get(&app(), "/packs/bad%20id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn api_prefix_serves_same_routes() {
    let app = app();
    let (status, direct) = get(&app, "/packs/p1").await;
    let (api_status, prefixed) = get(&app, "/api/packs/p1").await;
    assert_eq!(status, api_status);
    assert_eq!(direct, prefixed);

    let (status, list) = get(&app, "/api/packs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn health_reports_service() {
    let (status, body) = get(&app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "pack-service");
    assert_eq!(body["version"], pack_service::PKG_VERSION);
}

#[tokio::test]
async fn metrics_endpoint_is_prometheus_text() {
    let app = app();
    get(&app, "/packs").await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("packs_requests_total"));
    assert!(text.lines().any(|line| {
        line.starts_with("packs_available_total")
            && line.split_whitespace().last().and_then(|v| v.parse::<f64>().ok()) == Some(1.0)
    }));
}

#[tokio::test]
async fn each_request_records_one_sample() {
    let (app, metrics) = metered_app();
    let cases = [
        ("/packs", "/packs", "2xx"),
        ("/packs/p1", "/packs/{id}", "2xx"),
        ("/api/packs/p1/content", "/packs/{id}/content", "2xx"),
        ("/packs/missing", "/packs/{id}", "4xx"),
        ("/packs/bad%20id/content", "/packs/{id}/content", "4xx"),
    ];
    for (uri, operation, status) in cases {
        let before = metrics.export();
        get(&app, uri).await;
        let after = metrics.export();

        let labels = [("transport", "http"), ("operation", operation), ("status", status)];
        assert_eq!(
            sample(&after, "packs_requests_total", &labels)
                - sample(&before, "packs_requests_total", &labels),
            1.0,
            "{uri}"
        );
        assert_eq!(
            sample(&after, "packs_requests_total", &[])
                - sample(&before, "packs_requests_total", &[]),
            1.0,
            "{uri}"
        );
        let count = "packs_request_duration_seconds_count";
        let timed = [("transport", "http"), ("operation", operation)];
        assert_eq!(
            sample(&after, count, &timed) - sample(&before, count, &timed),
            1.0,
            "{uri}"
        );
    }
}

#[tokio::test]
async fn probes_are_not_counted_as_requests() {
    let app = app();
    get(&app, "/packs").await;

    let first = scrape(&app).await;
    get(&app, "/health").await;
    let second = scrape(&app).await;

    assert_eq!(sample(&first, "packs_requests_total", &[]), 1.0);
    assert_eq!(sample(&second, "packs_requests_total", &[]), 1.0);
    assert_eq!(
        sample(&second, "packs_request_duration_seconds_count", &[]),
        1.0
    );
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _) = get(&app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
