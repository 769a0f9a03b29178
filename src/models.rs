use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::{FaultKind, PulseMonitorError, Result};

pub const PATIENT_ID_ATTRIBUTE: &str = "patientId";
pub const TIMESTAMP_ATTRIBUTE: &str = "timestamp";
pub const VALUE_ATTRIBUTE: &str = "value";

/// Значение атрибута в формате DynamoDB stream (`{"N": "155"}`).
/// Типы, которые анализатор не читает (`L`, `M`, `SS`, `B`...), становятся `Other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttributeValue {
    #[serde(rename = "N")]
    Number(String),
    #[serde(rename = "S")]
    String(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(skip_serializing)]
    Other,
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tagged = HashMap::<String, Value>::deserialize(deserializer)?;
        let Some((tag, raw)) = tagged.into_iter().next() else {
            return Ok(AttributeValue::Other);
        };

        Ok(match (tag.as_str(), raw) {
            ("N", Value::String(n)) => AttributeValue::Number(n),
            ("N", Value::Number(n)) => AttributeValue::Number(n.to_string()),
            ("S", Value::String(s)) => AttributeValue::String(s),
            ("BOOL", Value::Bool(b)) => AttributeValue::Bool(b),
            ("NULL", Value::Bool(b)) => AttributeValue::Null(b),
            _ => AttributeValue::Other,
        })
    }
}

impl AttributeValue {
    pub fn number(value: impl ToString) -> Self {
        AttributeValue::Number(value.to_string())
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Number(n) => Some(n),
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

pub type NewImage = HashMap<String, AttributeValue>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "NewImage", default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<NewImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(default)]
    pub dynamodb: StreamRecord,
}

impl ChangeEvent {
    pub fn insert(image: NewImage) -> Self {
        ChangeEvent {
            event_name: "INSERT".to_string(),
            dynamodb: StreamRecord { new_image: Some(image) },
        }
    }

    pub fn is_insert(&self) -> bool {
        self.event_name == "INSERT"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<ChangeEvent>,
}

/// Поля, нужные для классификации. `timestamp` читается только при сохранении
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementRecord {
    pub patient_id: i64,
    pub value: i64,
}

impl MeasurementRecord {
    /// Извлекает `patientId` и `value`; остальные атрибуты игнорируются
    pub fn from_image(image: &NewImage) -> Result<Self> {
        Ok(MeasurementRecord {
            patient_id: parse_attribute(image, PATIENT_ID_ATTRIBUTE)?,
            value: parse_attribute(image, VALUE_ATTRIBUTE)?,
        })
    }

    pub fn to_abnormal(&self, image: &NewImage) -> Result<AbnormalRecord> {
        Ok(AbnormalRecord {
            patient_id: self.patient_id,
            timestamp: parse_attribute(image, TIMESTAMP_ATTRIBUTE)?,
            value: self.value,
        })
    }
}

fn parse_attribute(image: &NewImage, attribute: &str) -> Result<i64> {
    let raw = image
        .get(attribute)
        .and_then(AttributeValue::as_text)
        .ok_or_else(|| PulseMonitorError::MissingAttribute(attribute.to_string()))?;

    raw.trim()
        .parse::<i64>()
        .map_err(|_| PulseMonitorError::InvalidNumber {
            attribute: attribute.to_string(),
            value: raw.to_string(),
        })
}

/// Допустимый диапазон пульса пациента, границы включены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Self {
        Range { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_abnormal(&self, value: i64) -> bool {
        !self.contains(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbnormalRecord {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    pub timestamp: i64,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoNewImage,
    NotInsert,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Skipped { reason: SkipReason },
    Normal,
    Persisted { record: AbnormalRecord },
    Faulted { kind: FaultKind, message: String },
}

impl RecordOutcome {
    pub fn faulted(error: &PulseMonitorError) -> Self {
        RecordOutcome::Faulted {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub received: usize,
    pub skipped: usize,
    pub normal: usize,
    pub persisted: usize,
    pub faulted: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[RecordOutcome]) -> Self {
        outcomes.iter().fold(
            BatchSummary {
                received: outcomes.len(),
                ..Default::default()
            },
            |mut summary, outcome| {
                match outcome {
                    RecordOutcome::Skipped { .. } => summary.skipped += 1,
                    RecordOutcome::Normal => summary.normal += 1,
                    RecordOutcome::Persisted { .. } => summary.persisted += 1,
                    RecordOutcome::Faulted { .. } => summary.faulted += 1,
                }
                summary
            },
        )
    }
}
