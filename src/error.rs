use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the upstream rate provider. Always fatal for a run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("'{0}' is not a valid currency code")]
    InvalidBase(String),
    #[error("request to rate provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("rate provider responded with {0}")]
    Status(StatusCode),
    #[error("malformed rate provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("last update timestamp {0} is out of range")]
    Timestamp(i64),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("rate for {currency} on {date} already exists")]
    DuplicateRow { date: NaiveDate, currency: String },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateRow { .. })
    }
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to fetch exchange rates: {0}")]
    UpstreamFetch(#[from] FetchError),
    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}
