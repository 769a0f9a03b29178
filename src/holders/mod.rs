use async_trait::async_trait;

use crate::errors::Result;
use crate::models::AbnormalRecord;

pub mod abnormal;
pub mod json_lines;

pub use abnormal::AbnormalValuesHolder;
pub use json_lines::JsonLinesStore;

/// Долговременное хранилище аномальных значений: запись один раз, чтение по пациенту
#[async_trait]
pub trait AbnormalStore: Send + Sync {
    async fn persist(&self, record: &AbnormalRecord) -> Result<()>;

    async fn find_by_patient(&self, patient_id: i64) -> Result<Vec<AbnormalRecord>>;
}
