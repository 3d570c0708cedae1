//! Record source abstractions

use crate::core::record::RawDomainRecord;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// A short description used in logs and errors.
    fn describe(&self) -> String;

    async fn fetch_records(&self) -> Result<Vec<RawDomainRecord>>;
}
