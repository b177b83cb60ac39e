//! Temperature classification and display helpers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper end of the gauge scale in degrees Celsius
pub const GAUGE_MAX_CELSIUS: f64 = 40.0;

/// Temperature band of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureClass {
    Cold,
    Normal,
    Warm,
    Hot,
}

impl fmt::Display for TemperatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureClass::Cold => write!(f, "Cold"),
            TemperatureClass::Normal => write!(f, "Normal"),
            TemperatureClass::Warm => write!(f, "Warm"),
            TemperatureClass::Hot => write!(f, "Hot"),
        }
    }
}

/// Colour used for a temperature band, for text and background alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Blue,
    Green,
    Yellow,
    Red,
}

impl ColorToken {
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Blue => "#3B82F6",
            ColorToken::Green => "#10B981",
            ColorToken::Yellow => "#F59E0B",
            ColorToken::Red => "#EF4444",
        }
    }
}

/// Classify a temperature. Lower bounds are inclusive: 10.0 is Normal.
pub fn classify(temperature: f64) -> TemperatureClass {
    if temperature < 10.0 {
        TemperatureClass::Cold
    } else if temperature < 20.0 {
        TemperatureClass::Normal
    } else if temperature < 25.0 {
        TemperatureClass::Warm
    } else {
        TemperatureClass::Hot
    }
}

pub fn display_color(class: TemperatureClass) -> ColorToken {
    match class {
        TemperatureClass::Cold => ColorToken::Blue,
        TemperatureClass::Normal => ColorToken::Green,
        TemperatureClass::Warm => ColorToken::Yellow,
        TemperatureClass::Hot => ColorToken::Red,
    }
}

/// Fraction of the gauge to fill, `temperature / 40` clamped into [0, 1]
pub fn normalize_for_gauge(temperature: f64) -> f64 {
    // f64::clamp propagates NaN; max/min maps it to 0 instead
    (temperature / GAUGE_MAX_CELSIUS).max(0.0).min(1.0)
}

pub fn format_temperature(temperature: f64) -> String {
    format!("{:.1}°C", temperature)
}
