//! Error types for the sensor dashboard

/// Errors that can occur in the sensor dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP error! Status: {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid polling interval: {0} ms")]
    InvalidInterval(u64),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Polling controller has stopped")]
    ControllerStopped,
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
