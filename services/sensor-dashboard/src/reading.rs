//! Sensor readings and the views derived from them

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of raw readings kept for the trend chart
pub const MAX_CHART_POINTS: usize = 20;

/// One temperature sample reported by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub sensor_id: i64,
    /// Degrees Celsius
    pub temperature: f64,
}

impl SensorReading {
    pub fn new(sensor_id: i64, temperature: f64) -> Self {
        Self {
            sensor_id,
            temperature,
        }
    }
}

/// A point on the trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub sensor_id: i64,
    pub temperature: f64,
}

/// Latest reading per sensor id.
///
/// Later entries override earlier ones with the same id. Each id keeps the
/// position where it was first seen, so the card order stays stable while
/// values change.
pub fn latest_per_sensor(readings: &[SensorReading]) -> Vec<SensorReading> {
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut latest: Vec<SensorReading> = Vec::new();

    for reading in readings {
        match positions.get(&reading.sensor_id) {
            Some(&index) => latest[index] = *reading,
            None => {
                positions.insert(reading.sensor_id, latest.len());
                latest.push(*reading);
            }
        }
    }

    latest
}

/// The most recent `MAX_CHART_POINTS` raw readings, oldest first
pub fn chart_series(readings: &[SensorReading]) -> Vec<ChartPoint> {
    let start = readings.len().saturating_sub(MAX_CHART_POINTS);
    readings[start..]
        .iter()
        .enumerate()
        .map(|(index, reading)| ChartPoint {
            label: format!("Reading {}", index + 1),
            sensor_id: reading.sensor_id,
            temperature: reading.temperature,
        })
        .collect()
}

/// Value- and order-sensitive comparison of two reading lists
pub fn same_content(a: &[SensorReading], b: &[SensorReading]) -> bool {
    a == b
}
