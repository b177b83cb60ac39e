//! Web dashboard with JSON API endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::classify::{
    classify, display_color, format_temperature, normalize_for_gauge, ColorToken,
    TemperatureClass,
};
use crate::config::RefreshInterval;
use crate::poller::{PollerHandle, RefreshOutcome};
use crate::reading::{chart_series, latest_per_sensor, ChartPoint, SensorReading};

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 220.0;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub poller: PollerHandle,
}

/// One entry of the display set, ready to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorCard {
    pub sensor_id: i64,
    pub temperature: f64,
    pub formatted: String,
    pub status: TemperatureClass,
    pub color: ColorToken,
    pub color_hex: String,
    pub gauge: f64,
}

impl From<&SensorReading> for SensorCard {
    fn from(reading: &SensorReading) -> Self {
        let status = classify(reading.temperature);
        let color = display_color(status);
        Self {
            sensor_id: reading.sensor_id,
            temperature: reading.temperature,
            formatted: format_temperature(reading.temperature),
            status,
            color,
            color_hex: color.hex().to_string(),
            gauge: normalize_for_gauge(reading.temperature),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntervalRequest {
    interval_ms: u64,
}

/// Build the dashboard axum router
pub fn build_router(poller: PollerHandle) -> Router {
    let dashboard_state = DashboardState { poller };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/readings", get(readings_handler))
        .route("/api/sensors", get(sensors_handler))
        .route("/api/sensors/{id}", get(sensor_handler))
        .route("/api/chart", get(chart_handler))
        .route("/api/intervals", get(intervals_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/interval", put(interval_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

fn sensor_cards(readings: &[SensorReading]) -> Vec<SensorCard> {
    latest_per_sensor(readings)
        .iter()
        .map(SensorCard::from)
        .collect()
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.poller.state().read().await;
    let cards = sensor_cards(&state.readings);
    let series = chart_series(&state.readings);

    let error_banner = match &state.last_error {
        Some(message) => format!(
            r#"<div id="error" style="margin-bottom: 1rem; padding: 0.75rem; border-left: 4px solid #EF4444; background-color: #FEE2E2; color: #B91C1C;">{}</div>"#,
            message
        ),
        None => String::new(),
    };

    let interval_options: String = RefreshInterval::ALL
        .iter()
        .map(|i| {
            let selected = if i.as_millis() == state.interval_ms {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                i.as_millis(),
                selected,
                i
            )
        })
        .collect();

    let sensor_cards_html: String = if state.is_loading && cards.is_empty() {
        r#"<p style="color: #6B7280;">Loading...</p>"#.to_string()
    } else {
        cards
            .iter()
            .map(|c| {
                format!(
                    r#"<div style="border: 1px solid #E5E7EB; border-radius: 0.5rem; padding: 1rem;">
                    <h4 style="margin: 0 0 0.5rem 0;">Sensor #{}</h4>
                    <div style="height: 0.75rem; background-color: #E5E7EB; border-radius: 0.375rem; overflow: hidden;">
                        <div style="height: 100%; width: {:.1}%; background-color: {};"></div>
                    </div>
                    <p style="margin: 0.5rem 0 0 0; font-size: 1.5rem; font-weight: 700; color: {};">{}</p>
                    <p style="margin: 0; color: #6B7280;">{}</p>
                </div>"#,
                    c.sensor_id,
                    c.gauge * 100.0,
                    c.color_hex,
                    c.color_hex,
                    c.formatted,
                    c.status
                )
            })
            .collect()
    };

    let button_label = if state.is_loading {
        "Loading..."
    } else {
        "Refresh Now"
    };
    let disabled = if state.is_loading { " disabled" } else { "" };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Sensor Dashboard</title>
    <script>
        function refreshNow() {{
            fetch('/api/refresh', {{ method: 'POST' }}).then(() => setTimeout(() => location.reload(), 500));
        }}
        function changeInterval(value) {{
            fetch('/api/interval', {{
                method: 'PUT',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify({{ interval_ms: Number(value) }})
            }}).then(() => location.reload());
        }}
        setTimeout(() => location.reload(), {interval_ms});
    </script>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>Sensor Dashboard</h1>
    {error_banner}
    <section style="display: flex; justify-content: space-between; align-items: center;">
        <h2>Sensor Overview</h2>
        <div>
            <label for="refresh">Refresh:</label>
            <select id="refresh" onchange="changeInterval(this.value)">{interval_options}</select>
            <button onclick="refreshNow()"{disabled}>{button_label}</button>
        </div>
    </section>
    <p style="color: #6B7280;">Last updated: <script>document.write(new Date({last_updated}).toLocaleTimeString())</script></p>
    <section>
        <h3>Sensor Temperature Overview</h3>
        {chart}
    </section>
    <section>
        <h3>Individual Sensors</h3>
        <div style="display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1rem;">{sensor_cards_html}</div>
    </section>
</body>
</html>"#,
        interval_ms = state.interval_ms,
        error_banner = error_banner,
        interval_options = interval_options,
        disabled = disabled,
        button_label = button_label,
        last_updated = state.last_updated_epoch_ms,
        chart = render_chart(&series),
        sensor_cards_html = sensor_cards_html,
    );

    Html(html)
}

/// Inline SVG line chart of the chart series
fn render_chart(series: &[ChartPoint]) -> String {
    if series.is_empty() {
        return r#"<p style="color: #6B7280;">No readings yet</p>"#.to_string();
    }

    let (mut min, mut max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.temperature), hi.max(p.temperature))
        });
    if (max - min).abs() < f64::EPSILON {
        min -= 1.0;
        max += 1.0;
    }
    // A span that overflows would turn every y into NaN
    let span = (max - min).min(f64::MAX);

    let step = if series.len() > 1 {
        CHART_WIDTH / (series.len() - 1) as f64
    } else {
        0.0
    };
    let coords: Vec<(f64, f64, &ChartPoint)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = i as f64 * step;
            let offset = ((p.temperature - min) / span).clamp(0.0, 1.0);
            let y = CHART_HEIGHT - offset * CHART_HEIGHT;
            (x, y, p)
        })
        .collect();

    let points: Vec<String> = coords
        .iter()
        .map(|(x, y, _)| format!("{:.1},{:.1}", x, y))
        .collect();
    let dots: String = coords
        .iter()
        .map(|(x, y, p)| {
            format!(
                r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#0072ff"><title>{}: Sensor #{} {}</title></circle>"##,
                x,
                y,
                p.label,
                p.sensor_id,
                format_temperature(p.temperature)
            )
        })
        .collect();

    format!(
        r##"<svg viewBox="-10 -10 {w} {h}" style="width: 100%; height: 16rem;">
            <polyline fill="none" stroke="#0072ff" stroke-width="2" points="{points}"/>
            {dots}
        </svg>"##,
        w = CHART_WIDTH + 20.0,
        h = CHART_HEIGHT + 20.0,
        points = points.join(" "),
        dots = dots,
    )
}

async fn status_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.poller.state().read().await;
    Json(state.snapshot())
}

async fn readings_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.poller.state().read().await;
    Json(state.readings.clone())
}

async fn sensors_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.poller.state().read().await;
    Json(sensor_cards(&state.readings))
}

async fn sensor_handler(
    State(dashboard): State<DashboardState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let state = dashboard.poller.state().read().await;
    match sensor_cards(&state.readings)
        .into_iter()
        .find(|c| c.sensor_id == id)
    {
        Some(card) => (StatusCode::OK, Json(serde_json::json!(card))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("Unknown sensor {}", id) })),
        ),
    }
}

async fn chart_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.poller.state().read().await;
    Json(chart_series(&state.readings))
}

async fn intervals_handler() -> impl IntoResponse {
    let intervals: Vec<serde_json::Value> = RefreshInterval::ALL
        .iter()
        .map(|i| {
            serde_json::json!({
                "interval_ms": i.as_millis(),
                "label": i.to_string(),
            })
        })
        .collect();

    Json(intervals)
}

async fn refresh_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    match dashboard.poller.refresh_now().await {
        Ok(RefreshOutcome::Queued) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "queued" })),
        ),
        Ok(RefreshOutcome::Busy) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "status": "busy" })),
        ),
        Err(e) => {
            tracing::warn!("Manual refresh failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}

async fn interval_handler(
    State(dashboard): State<DashboardState>,
    Json(request): Json<IntervalRequest>,
) -> impl IntoResponse {
    let interval = match RefreshInterval::try_from(request.interval_ms) {
        Ok(i) => i,
        Err(e) => {
            tracing::debug!("Rejected interval change: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }
    };

    match dashboard.poller.set_interval(interval.as_duration()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "interval_ms": interval.as_millis() })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
