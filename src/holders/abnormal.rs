use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::holders::AbnormalStore;
use crate::models::AbnormalRecord;

#[derive(Clone, Default)]
pub struct AbnormalValuesHolder {
    records: Arc<Mutex<Vec<AbnormalRecord>>>,
}

impl AbnormalValuesHolder {
    pub fn new() -> Self {
        AbnormalValuesHolder {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn get(&self) -> Vec<AbnormalRecord> {
        let records = self.records.lock().await;
        records.clone()
    }

    pub async fn len(&self) -> usize {
        let records = self.records.lock().await;
        records.len()
    }
}

#[async_trait]
impl AbnormalStore for AbnormalValuesHolder {
    async fn persist(&self, record: &AbnormalRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.push(*record);
        Ok(())
    }

    async fn find_by_patient(&self, patient_id: i64) -> Result<Vec<AbnormalRecord>> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .copied()
            .collect())
    }
}
