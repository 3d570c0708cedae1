pub mod monthly;
pub mod records;
pub mod setup;
pub mod summary;
pub mod ui;

use crate::core::config::AppConfig;
use crate::core::ingest::{IngestReport, ingest};
use crate::core::{RawDomainRecord, RecordSource};
use crate::providers;
use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{debug, info};

/// Fetches records from every configured source concurrently, then
/// validates and normalizes them.
pub async fn load_records(config: &AppConfig) -> Result<IngestReport> {
    let sources = providers::sources_from_config(config);
    let raw_records = fetch_all(&sources).await?;
    info!(
        "Fetched {} records from {} sources",
        raw_records.len(),
        sources.len()
    );

    Ok(ingest(&raw_records, &config.rate_table(), config.registration))
}

async fn fetch_all(sources: &[Box<dyn RecordSource>]) -> Result<Vec<RawDomainRecord>> {
    let pb = ui::new_progress_bar(sources.len() as u64, "Loading records...");

    let fetch_futures = sources.iter().map(|source| {
        let pb_clone = pb.clone();
        async move {
            let res = source
                .fetch_records()
                .await
                .with_context(|| format!("Failed to load records from {}", source.describe()));
            pb_clone.inc(1);
            res
        }
    });
    let results = join_all(fetch_futures).await;
    pb.finish_and_clear();

    let mut records = Vec::new();
    for result in results {
        let mut batch = result?;
        debug!("Source returned {} records", batch.len());
        records.append(&mut batch);
    }
    Ok(records)
}
