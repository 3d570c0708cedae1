use crate::core::{RawDomainRecord, RecordSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads records from a local JSON file, or YAML when the extension is
/// `.yaml`/`.yml`.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        )
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch_records(&self) -> Result<Vec<RawDomainRecord>> {
        debug!("Reading records from {}", self.path.display());
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read records file: {}", self.path.display()))?;

        let records: Vec<RawDomainRecord> = if self.is_yaml() {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse records file: {}", self.path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse records file: {}", self.path.display())
            })?
        };

        debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}
