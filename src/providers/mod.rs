pub mod file_source;
pub mod http_source;
pub mod util;

use crate::core::RecordSource;
use crate::core::config::{AppConfig, SourceConfig};

/// Builds the record sources named in the configuration.
pub fn sources_from_config(config: &AppConfig) -> Vec<Box<dyn RecordSource>> {
    config
        .sources
        .iter()
        .map(|source| match source {
            SourceConfig::File { file } => {
                Box::new(file_source::FileSource::new(config.resolve_path(file)))
                    as Box<dyn RecordSource>
            }
            SourceConfig::Http { url } => {
                Box::new(http_source::HttpSource::new(url)) as Box<dyn RecordSource>
            }
        })
        .collect()
}
