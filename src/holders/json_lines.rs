use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::{PulseMonitorError, Result};
use crate::holders::AbnormalStore;
use crate::models::AbnormalRecord;

/// Файловое хранилище: одна JSON-строка на запись, только дозапись
#[derive(Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonLinesStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonLinesStore {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AbnormalStore for JsonLinesStore {
    async fn persist(&self, record: &AbnormalRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn find_by_patient(&self, patient_id: i64) -> Result<Vec<AbnormalRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut result = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: AbnormalRecord = serde_json::from_str(line).map_err(|e| {
                PulseMonitorError::Storage(format!(
                    "{}:{}: {}",
                    self.path.display(),
                    number + 1,
                    e
                ))
            })?;
            if record.patient_id == patient_id {
                result.push(record);
            }
        }
        Ok(result)
    }
}
