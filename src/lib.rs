pub mod config;
pub mod error;
pub mod ingest;
pub mod rate;
pub mod rate_source;
pub mod store;

use chrono::NaiveDate;
use log::info;

use crate::config::Config;
use crate::error::IngestError;
use crate::ingest::IngestOutcome;
use crate::rate_source::RateSource;
use crate::store::mysql::MySqlRateStore;

/// Runs one ingestion against the configured MySQL database.
pub async fn run(config: &Config, today: NaiveDate) -> Result<IngestOutcome, IngestError> {
    info!("Updating {} rates for {today}", config.base_currency);

    let source = RateSource::new(&config.api_base_url, &config.api_key, config.http_timeout)?;
    let mut store = MySqlRateStore::connect(&config.database)
        .await
        .map_err(IngestError::Storage)?;

    ingest::run_job(&mut store, &source, &config.base_currency, today).await
}
