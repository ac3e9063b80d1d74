pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::rate::Rate;

/// Persistence for [`Rate`] rows keyed by (`date`, `currency`).
#[async_trait]
pub trait RateStore: Send {
    /// Latest date present in the table, `None` when it is empty.
    async fn max_date(&mut self) -> Result<Option<NaiveDate>, StoreError>;

    /// Inserts a single row atomically. A row that already exists for the
    /// same date and currency yields [`StoreError::DuplicateRow`].
    async fn insert_rate(&mut self, rate: &Rate) -> Result<(), StoreError>;

    /// Releases the underlying connection. Safe to call more than once.
    async fn close(&mut self);
}
