use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use super::RateStore;
use crate::error::StoreError;
use crate::rate::Rate;

/// In-process store with the same uniqueness rule as the `rates` table.
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    rows: BTreeMap<(NaiveDate, String), f64>,
    closed: bool,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: impl IntoIterator<Item = Rate>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|r| ((r.date, r.currency), r.to_base))
                .collect(),
            closed: false,
        }
    }

    pub fn rows(&self) -> Vec<Rate> {
        self.rows
            .iter()
            .map(|((date, currency), to_base)| Rate {
                date: *date,
                currency: currency.clone(),
                to_base: *to_base,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn max_date(&mut self) -> Result<Option<NaiveDate>, StoreError> {
        self.ensure_open()?;
        Ok(self.rows.keys().map(|(date, _)| *date).max())
    }

    async fn insert_rate(&mut self, rate: &Rate) -> Result<(), StoreError> {
        self.ensure_open()?;

        let key = (rate.date, rate.currency.clone());
        if self.rows.contains_key(&key) {
            return Err(StoreError::DuplicateRow {
                date: rate.date,
                currency: rate.currency.clone(),
            });
        }
        self.rows.insert(key, rate.to_base);
        Ok(())
    }

    async fn close(&mut self) {
        if !self.closed {
            debug!("Closing in-memory rate store ({} rows)", self.rows.len());
            self.closed = true;
        }
    }
}
