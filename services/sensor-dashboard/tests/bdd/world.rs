//! BDD test world for the sensor dashboard

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cucumber::World;
use tokio_util::sync::CancellationToken;

use sensor_dashboard::classify::TemperatureClass;
use sensor_dashboard::io::{HttpClient, HttpResponse};
use sensor_dashboard::poller::{Poller, PollerHandle};
use sensor_dashboard::reading::SensorReading;
use sensor_dashboard::source::HttpReadingSource;
use sensor_dashboard::state::new_state_handle;

/// An HTTP client that replays queued responses, repeating the last one
#[derive(Debug, Default, Clone)]
pub struct ScriptedHttpClient {
    pub responses: Arc<Mutex<VecDeque<HttpResponse>>>,
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, _url: &str) -> sensor_dashboard::Result<HttpResponse> {
        let mut responses = self.responses.lock().unwrap();
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.ok_or_else(|| {
            sensor_dashboard::DashboardError::Http("connection refused".to_string())
        })
    }
}

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    // Classification testing
    pub temperature: Option<f64>,
    pub class: Option<TemperatureClass>,
    pub gauge: Option<f64>,

    // Polling testing
    pub http: ScriptedHttpClient,
    pub poller: Option<Poller>,
    pub handle: Option<PollerHandle>,
    pub remembered_updated_ms: Option<u64>,

    // Dashboard testing
    pub response_status: Option<u16>,
    pub response_body: Option<String>,
}

impl DashboardWorld {
    pub fn queue_response(&mut self, status: u16, body: &str) {
        self.http.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    /// Build the poller on first use, wired to the scripted endpoint
    pub fn poller(&mut self) -> &Poller {
        if self.poller.is_none() {
            let source = HttpReadingSource::new("http://sensors.test", Arc::new(self.http.clone()));
            let (poller, handle) = Poller::new(
                Arc::new(source),
                new_state_handle(5000, 1),
                Duration::from_millis(5000),
                CancellationToken::new(),
            )
            .expect("valid interval");
            self.poller = Some(poller);
            self.handle = Some(handle);
        }
        self.poller.as_ref().expect("poller just built")
    }

    pub fn handle(&self) -> &PollerHandle {
        self.handle.as_ref().expect("poller not built")
    }
}

/// Parse `"1:18.5, 2:22.0"` into readings
pub fn parse_readings(list: &str) -> Vec<SensorReading> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (id, temp) = pair
                .split_once(':')
                .unwrap_or_else(|| panic!("bad reading '{}'", pair));
            SensorReading::new(id.trim().parse().unwrap(), temp.trim().parse().unwrap())
        })
        .collect()
}

pub fn readings_json(readings: &[SensorReading]) -> String {
    serde_json::to_string(readings).unwrap()
}
