//! BDD step definitions for the dashboard feature

use axum::body::Body;
use axum::http::Request;
use cucumber::{given, then, when};
use tower::ServiceExt;

use sensor_dashboard::dashboard::build_router;

use crate::world::{parse_readings, readings_json, DashboardWorld};

#[given(expr = "the dashboard shows readings {string}")]
async fn dashboard_shows_readings(world: &mut DashboardWorld, readings: String) {
    let body = readings_json(&parse_readings(&readings));
    world.queue_response(200, &body);
    world.poller().refresh().await;
}

async fn send(world: &mut DashboardWorld, request: Request<Body>) {
    world.poller();
    let app = build_router(world.handle().clone());
    let response = app.oneshot(request).await.unwrap();
    world.response_status = Some(response.status().as_u16());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_body = Some(String::from_utf8(body.to_vec()).unwrap());
}

#[when(expr = "{string} is requested")]
async fn path_requested(world: &mut DashboardWorld, path: String) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(world, request).await;
}

#[when("a manual refresh is requested")]
async fn manual_refresh(world: &mut DashboardWorld) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/refresh")
        .body(Body::empty())
        .unwrap();
    send(world, request).await;
}

#[when(expr = "a fetch is in flight")]
async fn fetch_in_flight(world: &mut DashboardWorld) {
    world.poller();
    world.handle().state().write().await.begin_fetch();
}

#[when(expr = "the refresh interval is set to {int} ms")]
async fn interval_set(world: &mut DashboardWorld, interval_ms: u64) {
    let request = Request::builder()
        .method("PUT")
        .uri("/api/interval")
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{"interval_ms": {}}}"#, interval_ms)))
        .unwrap();
    send(world, request).await;
}

#[then(expr = "the response status should be {int}")]
fn response_status(world: &mut DashboardWorld, expected: u16) {
    assert_eq!(world.response_status, Some(expected));
}

#[then(expr = "the response should contain {string}")]
fn response_contains(world: &mut DashboardWorld, expected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        body.contains(&expected),
        "Expected response to contain '{}', but it didn't.\nResponse body:\n{}",
        expected,
        body
    );
}

#[then(expr = "the response should not contain {string}")]
fn response_not_contains(world: &mut DashboardWorld, unexpected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        !body.contains(&unexpected),
        "Expected response not to contain '{}'.\nResponse body:\n{}",
        unexpected,
        body
    );
}
