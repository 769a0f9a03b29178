use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{PulseMonitorError, Result};
use crate::models::{Range, PATIENT_ID_ATTRIBUTE};

/// Реестр диапазонов: строится один раз при старте и дальше только читается
#[derive(Debug, Clone)]
pub struct RangeRegistry {
    ranges: HashMap<String, Range>,
}

impl RangeRegistry {
    pub fn new(ranges: HashMap<String, Range>) -> Self {
        RangeRegistry { ranges }
    }

    pub fn get(&self, patient_id: &str) -> Option<Range> {
        self.ranges.get(patient_id).copied()
    }
}

impl Default for RangeRegistry {
    fn default() -> Self {
        RangeRegistry::new(HashMap::from([
            ("1".to_string(), Range::new(60, 150)),
            ("2".to_string(), Range::new(70, 160)),
            ("3".to_string(), Range::new(50, 200)),
            ("4".to_string(), Range::new(70, 180)),
            ("5".to_string(), Range::new(50, 190)),
        ]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RangeResponse {
    fn json(status_code: u16, body: serde_json::Value) -> Self {
        RangeResponse {
            status_code,
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct RangeProviderService {
    registry: Arc<RangeRegistry>,
}

impl RangeProviderService {
    pub fn new(registry: Arc<RangeRegistry>) -> Self {
        RangeProviderService { registry }
    }

    pub fn handle_request(&self, query: &HashMap<String, String>) -> RangeResponse {
        match self.lookup(query) {
            Ok(range) => {
                tracing::debug!("200, range from {} to {}", range.min, range.max);
                RangeResponse::json(200, json!({ "min": range.min, "max": range.max }))
            }
            Err(e) => {
                let status_code = match &e {
                    PulseMonitorError::MissingParameter(_) => 400,
                    _ => 404,
                };
                RangeResponse::json(status_code, json!({ "error": e.to_string() }))
            }
        }
    }

    fn lookup(&self, query: &HashMap<String, String>) -> Result<Range> {
        let patient_id = query.get(PATIENT_ID_ATTRIBUTE).ok_or_else(|| {
            tracing::warn!("no patientId parameter");
            PulseMonitorError::MissingParameter(PATIENT_ID_ATTRIBUTE.to_string())
        })?;

        let patient_id = patient_id.trim();
        self.registry.get(patient_id).ok_or_else(|| {
            tracing::warn!("{} not found in ranges", patient_id);
            PulseMonitorError::PatientNotFound(patient_id.to_string())
        })
    }
}
