//! Turns raw source records into normalized records ready for aggregation.

use crate::core::currency::RateTable;
use crate::core::record::{DomainRecord, RawDomainRecord};
use crate::core::registration::{RegistrationEstimator, RegistrationPolicy};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct IngestReport {
    pub records: Vec<DomainRecord>,
    pub rejected: usize,
}

/// Validates, converts to the reference currency and fills in registration
/// dates. Invalid records are logged and dropped.
pub fn ingest(
    raw_records: &[RawDomainRecord],
    rates: &RateTable,
    policy: RegistrationPolicy,
) -> IngestReport {
    let mut estimator = RegistrationEstimator::new(policy);
    let mut records = Vec::with_capacity(raw_records.len());
    let mut rejected = 0;

    for raw in raw_records {
        match raw.parse(rates.reference()) {
            Ok(record) => records.push(estimator.enrich(rates.normalize(record))),
            Err(e) => {
                warn!("Skipping record {}: {}", raw.label(), e);
                rejected += 1;
            }
        }
    }

    debug!(
        "Ingested {} records, rejected {}",
        records.len(),
        rejected
    );
    IngestReport { records, rejected }
}
