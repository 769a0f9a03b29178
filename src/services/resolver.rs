use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::errors::{PulseMonitorError, Result};
use crate::models::{Range, PATIENT_ID_ATTRIBUTE};

#[async_trait]
pub trait RangeResolver: Send + Sync {
    async fn resolve(&self, patient_id: i64, endpoint: &Url) -> Result<Range>;
}

/// Получает диапазон у range-provider: каждый вызов это новый запрос, без кэша и повторов
#[derive(Clone, Default)]
pub struct HttpRangeResolver {
    client: Client,
}

impl HttpRangeResolver {
    pub fn new() -> Self {
        HttpRangeResolver {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl RangeResolver for HttpRangeResolver {
    async fn resolve(&self, patient_id: i64, endpoint: &Url) -> Result<Range> {
        tracing::debug!("Requesting range for patient {} from {}", patient_id, endpoint);

        let response = self
            .client
            .get(endpoint.clone())
            .query(&[(PATIENT_ID_ATTRIBUTE, patient_id)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|json| json["error"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(PulseMonitorError::RangeServiceError(format!(
                "{} - {}",
                status, message
            )));
        }

        let range: Range = serde_json::from_str(&body)?;
        Ok(range)
    }
}
