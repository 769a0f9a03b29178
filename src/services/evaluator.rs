use reqwest::Url;
use std::sync::Arc;

use crate::errors::{PulseMonitorError, Result};
use crate::holders::AbnormalStore;
use crate::models::{MeasurementRecord, NewImage, RecordOutcome};
use crate::services::resolver::RangeResolver;

/// Решает судьбу одной записи: разбор, запрос диапазона, классификация, сохранение
#[derive(Clone)]
pub struct PulseEvaluator {
    resolver: Arc<dyn RangeResolver>,
    store: Arc<dyn AbnormalStore>,
    range_service_url: Option<String>,
}

impl PulseEvaluator {
    pub fn new(
        resolver: Arc<dyn RangeResolver>,
        store: Arc<dyn AbnormalStore>,
        range_service_url: Option<String>,
    ) -> Self {
        PulseEvaluator {
            resolver,
            store,
            range_service_url,
        }
    }

    /// Никогда не возвращает ошибку наружу: сбой записи превращается в `Faulted`
    pub async fn evaluate(&self, image: &NewImage) -> RecordOutcome {
        match self.try_evaluate(image).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("{}", e);
                RecordOutcome::faulted(&e)
            }
        }
    }

    async fn try_evaluate(&self, image: &NewImage) -> Result<RecordOutcome> {
        let record = MeasurementRecord::from_image(image)?;
        let endpoint = self.endpoint()?;
        let range = self.resolver.resolve(record.patient_id, &endpoint).await?;

        if !range.is_abnormal(record.value) {
            return Ok(RecordOutcome::Normal);
        }

        tracing::info!(patient_id = record.patient_id, value = record.value,
            "patientId: {}, value: {}", record.patient_id, record.value);
        let abnormal = record.to_abnormal(image)?;
        self.store.persist(&abnormal).await?;
        Ok(RecordOutcome::Persisted { record: abnormal })
    }

    fn endpoint(&self) -> Result<Url> {
        let raw = self.range_service_url.as_deref().ok_or_else(|| {
            PulseMonitorError::InvalidEndpoint("range service address is not configured".to_string())
        })?;

        let url = Url::parse(raw)
            .map_err(|e| PulseMonitorError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(PulseMonitorError::InvalidEndpoint(format!(
                "{}: expected an http(s) address",
                raw
            )));
        }
        Ok(url)
    }
}
