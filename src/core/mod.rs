//! Core business logic: records, currency normalization and metrics

pub mod analytics;
pub mod config;
pub mod currency;
pub mod ingest;
pub mod log;
pub mod record;
pub mod registration;
pub mod source;

// Re-export main types for cleaner imports
pub use analytics::{Lifecycle, MetricsSnapshot, MonthlyEntry, ReferenceClock, aggregate, classify};
pub use currency::RateTable;
pub use record::{DomainRecord, RawDomainRecord};
pub use registration::RegistrationPolicy;
pub use source::RecordSource;
