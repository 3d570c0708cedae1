use crate::core::{RawDomainRecord, RecordSource};
use crate::providers::util::send_with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

/// Fetches a JSON array of records from an HTTP endpoint.
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> Self {
        HttpSource {
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_records(&self) -> Result<Vec<RawDomainRecord>> {
        debug!("Requesting records from {}", self.url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("regdash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let response = send_with_retry(|| client.get(&self.url).send(), 3, 500)
            .await
            .with_context(|| format!("Failed to fetch records from {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Request to {} failed with status {}", self.url, status));
        }

        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text from {}", self.url))?;

        if response_text.trim().is_empty() {
            return Err(anyhow!("Received empty response from {}", self.url));
        }

        let records: Vec<RawDomainRecord> =
            serde_json::from_str(&response_text).with_context(|| {
                format!(
                    "Failed to parse records from {}. Response: '{response_text}'",
                    self.url
                )
            })?;

        debug!("Fetched {} records from {}", records.len(), self.url);
        Ok(records)
    }
}
