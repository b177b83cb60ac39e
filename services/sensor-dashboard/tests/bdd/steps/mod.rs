//! BDD step definitions for the sensor dashboard

pub mod classification_steps;
pub mod dashboard_steps;
pub mod polling_steps;
