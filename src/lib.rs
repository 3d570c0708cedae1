pub mod cli;
pub mod core;
pub mod providers;

use crate::core::ReferenceClock;
use crate::core::config::AppConfig;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Summary { json: bool },
    Monthly,
    Records,
}

/// Clock for `as_of` at midnight, or the current local time.
pub fn reference_clock(as_of: Option<NaiveDate>) -> ReferenceClock {
    match as_of {
        Some(date) => ReferenceClock::new(date.and_time(NaiveTime::MIN)),
        None => ReferenceClock::local(),
    }
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    as_of: Option<NaiveDate>,
) -> Result<()> {
    info!("Domain metrics starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let clock = reference_clock(as_of);
    debug!("Reference clock: {clock:?}");

    let report = cli::load_records(&config).await?;
    let currency = config.rate_table().reference().to_string();

    match command {
        AppCommand::Summary { json } => cli::summary::run(&report, &clock, &currency, json),
        AppCommand::Monthly => cli::monthly::run(&report, &clock, &currency),
        AppCommand::Records => cli::records::run(&report, &clock, &currency),
    }
}
