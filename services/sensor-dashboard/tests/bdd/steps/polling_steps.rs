//! BDD step definitions for the reconciliation feature

use cucumber::{given, then, when};

use sensor_dashboard::reading::latest_per_sensor;

use crate::world::{parse_readings, readings_json, DashboardWorld};

#[given(expr = "the sensor endpoint returns readings {string}")]
fn endpoint_returns_readings(world: &mut DashboardWorld, readings: String) {
    let body = readings_json(&parse_readings(&readings));
    world.queue_response(200, &body);
}

#[given(expr = "the sensor endpoint responds with status {int}")]
fn endpoint_responds_with_status(world: &mut DashboardWorld, status: u16) {
    world.queue_response(status, "Internal Server Error");
}

#[given(expr = "the sensor endpoint returns body {string}")]
fn endpoint_returns_body(world: &mut DashboardWorld, body: String) {
    world.queue_response(200, &body);
}

#[when("the dashboard refreshes")]
async fn dashboard_refreshes(world: &mut DashboardWorld) {
    world.poller().refresh().await;
}

#[when("the last-updated time is remembered")]
async fn remember_last_updated(world: &mut DashboardWorld) {
    world.poller();
    let updated = world.handle().state().read().await.last_updated_epoch_ms;
    world.remembered_updated_ms = Some(updated);
}

#[then(expr = "the current readings should be {string}")]
async fn current_readings(world: &mut DashboardWorld, expected: String) {
    let state = world.handle().state().read().await;
    assert_eq!(state.readings, parse_readings(&expected));
}

#[then(expr = "the sensor cards should be {string}")]
async fn sensor_cards(world: &mut DashboardWorld, expected: String) {
    let state = world.handle().state().read().await;
    assert_eq!(latest_per_sensor(&state.readings), parse_readings(&expected));
}

#[then("the last-updated time should be unchanged")]
async fn last_updated_unchanged(world: &mut DashboardWorld) {
    let remembered = world
        .remembered_updated_ms
        .expect("last-updated time was not remembered");
    let state = world.handle().state().read().await;
    assert_eq!(state.last_updated_epoch_ms, remembered);
}

#[then(expr = "the error {string} should be shown")]
async fn error_shown(world: &mut DashboardWorld, message: String) {
    let state = world.handle().state().read().await;
    assert_eq!(state.last_error.as_deref(), Some(message.as_str()));
}

#[then("no error should be shown")]
async fn no_error(world: &mut DashboardWorld) {
    let state = world.handle().state().read().await;
    assert!(
        state.last_error.is_none(),
        "unexpected error: {:?}",
        state.last_error
    );
}

#[then("the dashboard should not be loading")]
async fn not_loading(world: &mut DashboardWorld) {
    assert!(!world.handle().state().read().await.is_loading);
}
