//! Reading sources: where the polling controller gets its data

use std::sync::Arc;

use async_trait::async_trait;

use crate::io::HttpClient;
use crate::reading::SensorReading;

/// Something that produces the current list of sensor readings.
///
/// One call is one attempt. Retrying is the caller's business.
#[async_trait]
pub trait ReadingSource: Send + Sync + std::fmt::Debug {
    async fn fetch(&self) -> crate::Result<Vec<SensorReading>>;
}

/// Fetches readings with a single GET against a fixed URL
pub struct HttpReadingSource {
    url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpReadingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReadingSource")
            .field("url", &self.url)
            .finish()
    }
}

impl HttpReadingSource {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let url = url.into();
        tracing::debug!("Created HttpReadingSource for {}", url);
        Self { url, http }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReadingSource for HttpReadingSource {
    async fn fetch(&self) -> crate::Result<Vec<SensorReading>> {
        let response = self.http.get(&self.url).await?;

        if response.status != 200 {
            tracing::debug!(
                "Non-200 response from {}: status={}",
                self.url,
                response.status
            );
            return Err(crate::DashboardError::Status(response.status));
        }

        let readings: Vec<SensorReading> = serde_json::from_str(&response.body)?;
        tracing::debug!("Fetched {} readings from {}", readings.len(), self.url);
        Ok(readings)
    }
}
