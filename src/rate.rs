use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use log::warn;
use serde::Deserialize;

use crate::error::FetchError;

/// One stored conversion factor, unique per (`date`, `currency`).
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    pub date: NaiveDate,
    pub currency: String,
    pub to_base: f64,
}

/// Body of `/v6/{key}/latest/{base}`. Only the fields the job consumes.
#[derive(Debug, Deserialize, PartialEq)]
pub struct LatestRates {
    pub time_last_update_unix: i64,
    pub conversion_rates: BTreeMap<String, f64>,
}

impl LatestRates {
    /// UTC calendar date of the provider's last update.
    pub fn last_update_date(&self) -> Result<NaiveDate, FetchError> {
        DateTime::from_timestamp(self.time_last_update_unix, 0)
            .map(|dt| dt.date_naive())
            .ok_or(FetchError::Timestamp(self.time_last_update_unix))
    }

    /// Rows stamped with [`Self::last_update_date`]. Keys that are not
    /// three-letter codes cannot be stored and are dropped.
    pub fn into_rates(self) -> Result<Vec<Rate>, FetchError> {
        let date = self.last_update_date()?;

        Ok(self
            .conversion_rates
            .into_iter()
            .filter(|(currency, _)| {
                let valid = is_currency_code(currency);
                if !valid {
                    warn!("Skipping rate with invalid currency code '{currency}'");
                }
                valid
            })
            .map(|(currency, to_base)| Rate {
                date,
                currency,
                to_base,
            })
            .collect())
    }
}

pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}
