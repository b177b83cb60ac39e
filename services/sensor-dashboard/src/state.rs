//! Shared dashboard state driven by the polling controller

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::reading::{same_content, SensorReading};

/// Message shown to users whenever a fetch fails, whatever the cause
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load sensor data. Please try again later.";

/// Everything the presentation layer observes.
///
/// Fields are only changed through the transition methods below, each of which
/// is applied under a single write lock.
#[derive(Debug, Clone)]
pub struct PollState {
    pub readings: Vec<SensorReading>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub last_updated_epoch_ms: u64,
    pub interval_ms: u64,
    pub fetch_count: u64,
    pub consecutive_failures: u32,
}

/// Serializable summary for the status endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub last_updated_epoch_ms: u64,
    pub interval_ms: u64,
    pub reading_count: usize,
    pub sensor_count: usize,
    pub fetch_count: u64,
    pub consecutive_failures: u32,
}

impl PollState {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            readings: Vec::new(),
            is_loading: false,
            last_error: None,
            last_updated_epoch_ms: now_ms,
            interval_ms,
            fetch_count: 0,
            consecutive_failures: 0,
        }
    }

    /// Idle -> Loading
    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.fetch_count += 1;
    }

    /// Loading -> Success. Returns true if the readings changed.
    pub fn apply_success(&mut self, readings: Vec<SensorReading>, now_ms: u64) -> bool {
        self.is_loading = false;
        self.last_error = None;
        self.consecutive_failures = 0;

        if same_content(&self.readings, &readings) {
            return false;
        }
        self.readings = readings;
        self.last_updated_epoch_ms = now_ms;
        true
    }

    /// Loading -> Failure. Stale readings stay on display.
    pub fn apply_failure(&mut self) {
        self.is_loading = false;
        self.last_error = Some(FETCH_FAILED_MESSAGE.to_string());
        self.consecutive_failures += 1;
    }

    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            is_loading: self.is_loading,
            last_error: self.last_error.clone(),
            last_updated_epoch_ms: self.last_updated_epoch_ms,
            interval_ms: self.interval_ms,
            reading_count: self.readings.len(),
            sensor_count: crate::reading::latest_per_sensor(&self.readings).len(),
            fetch_count: self.fetch_count,
            consecutive_failures: self.consecutive_failures,
        }
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<PollState>>;

pub fn new_state_handle(interval_ms: u64, now_ms: u64) -> StateHandle {
    Arc::new(RwLock::new(PollState::new(interval_ms, now_ms)))
}
